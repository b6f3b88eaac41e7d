//! # Sale Service
//!
//! Records sales, applies stock deduction, and resolves lookups — including
//! the ordered free-text identifier chain.
//!
//! ## Stock Deduction Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Save Then Deduct (known gap)                           │
//! │                                                                         │
//! │  SaleStore::save ── COMMIT ──► item 1: reload, subtract, save          │
//! │                                item 2: reload, subtract, save          │
//! │                                item 3: ✗ InsufficientStock             │
//! │                                                                         │
//! │  The sale row and the item-1/item-2 deductions stay committed; no      │
//! │  compensation runs. Callers that need all-or-nothing must wrap the     │
//! │  call in an ambient transaction at the persistence boundary.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deduction reloads the product per item, so duplicate product references
//! within one sale compound sequentially.
//!
//! Concurrent saves against the same product are not coordinated here: two
//! requests can read the same pre-deduction quantity and both succeed,
//! overselling the product. Serialization is the surrounding
//! infrastructure's concern.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::dto::{SaleDto, SaleRequest};
use crate::error::{ServiceError, ServiceResult};
use storeman_core::{
    CoreError, NewSale, NewSaleItem, PaymentMode, Sale, SaleIdentifier, SaleType,
};
use storeman_db::Database;

/// The sale recording & lookup service.
///
/// ## Usage
/// ```rust,ignore
/// let service = SaleService::new(db);
/// let saved = service.save_sale(request).await?;
/// let sales = service.find_by_identifier("CASH").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    /// Creates a new SaleService over the given database handle.
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Records a sale: resolves the customer and products, persists the
    /// aggregate, then deducts each item's quantity from its product's stock.
    ///
    /// Any `saleId` in the request is ignored; the store assigns identity.
    ///
    /// ## Errors
    /// * [`CoreError::CustomerNotFound`] - customer reference is dangling
    /// * [`CoreError::ProductNotFound`] - a product reference is dangling
    /// * [`CoreError::InsufficientStock`] - a line would push stock below
    ///   zero; the sale and earlier deductions remain committed
    pub async fn save_sale(&self, request: SaleRequest) -> ServiceResult<SaleDto> {
        debug!(
            customer_id = request.customer.customer_id,
            items = request.items.len(),
            "save_sale"
        );

        let customers = self.db.customers();
        let products = self.db.products();

        let customer = customers
            .find_by_id(request.customer.customer_id)
            .await?
            .ok_or(CoreError::CustomerNotFound(request.customer.customer_id))?;

        // Every product reference must resolve before anything is written
        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = products
                .find_by_id(item.product.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(item.product.product_id))?;

            items.push(NewSaleItem {
                product_id: product.product_id,
                quantity: item.quantity,
                price: item.price,
                total_price: item.total_price,
            });
        }

        let new_sale = NewSale {
            customer_id: customer.customer_id,
            sale_date: request.sale_date.unwrap_or_else(chrono::Utc::now),
            payment_mode: request.payment_mode,
            sale_type: request.sale_type,
            gross_total: request.gross_total,
            items,
        };

        let sale = self.db.sales().save(new_sale).await?;

        // Deduction runs after the sale commit; a failing line leaves the
        // sale and earlier deductions in place (see module docs)
        for item in &sale.items {
            let mut product = products
                .find_by_id(item.product.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(item.product.product_id))?;

            let new_quantity = product.quantity - item.quantity;
            if new_quantity < Decimal::ZERO {
                return Err(CoreError::InsufficientStock {
                    product: product.product_name,
                    available: product.quantity,
                    requested: item.quantity,
                }
                .into());
            }

            product.quantity = new_quantity;
            products.save(&product).await?;
        }

        info!(
            sale_id = sale.sale_id,
            items = sale.items.len(),
            total = %sale.gross_total,
            "Sale recorded"
        );

        Ok(SaleDto::from(sale))
    }

    // =========================================================================
    // Identifier Lookups
    // =========================================================================

    /// Looks up sales by a free-text identifier: numeric sale id, payment
    /// mode name, sale type name, or customer name substring — in that
    /// order, first interpretation wins.
    ///
    /// The id branch is terminal even when the sale does not exist (yields
    /// an empty list); only genuinely non-numeric, non-enum input reaches
    /// the substring fallback.
    pub async fn find_by_identifier(&self, identifier: &str) -> ServiceResult<Vec<SaleDto>> {
        let sales = self.resolve_identifier(identifier).await?;
        Ok(translate(sales))
    }

    /// Like [`Self::find_by_identifier`], but returns only the first result
    /// of whichever interpretation matched.
    pub async fn find_single_by_identifier(
        &self,
        identifier: &str,
    ) -> ServiceResult<Option<SaleDto>> {
        let sales = self.resolve_identifier(identifier).await?;
        Ok(sales.into_iter().next().map(SaleDto::from))
    }

    /// Equivalent to [`Self::find_single_by_identifier`]; kept as a separate
    /// entry point for callers that phrase the lookup as "first match".
    pub async fn find_first_match_by_identifier(
        &self,
        identifier: &str,
    ) -> ServiceResult<Option<SaleDto>> {
        self.find_single_by_identifier(identifier).await
    }

    /// Runs the interpretation chain and the matching store query.
    async fn resolve_identifier(&self, identifier: &str) -> ServiceResult<Vec<Sale>> {
        let sales = self.db.sales();

        let found = match SaleIdentifier::interpret(identifier) {
            SaleIdentifier::Id(id) => sales.find_by_id(id).await?.into_iter().collect(),
            SaleIdentifier::PaymentMode(mode) => sales.find_by_payment_mode(mode).await?,
            SaleIdentifier::SaleType(kind) => sales.find_by_sale_type(kind).await?,
            SaleIdentifier::CustomerName(name) => sales.find_by_customer_name(&name).await?,
        };

        debug!(identifier, matches = found.len(), "Resolved identifier");
        Ok(found)
    }

    // =========================================================================
    // Plain Lookups
    // =========================================================================

    /// Returns all sales.
    pub async fn get_all_sales(&self) -> ServiceResult<Vec<SaleDto>> {
        Ok(translate(self.db.sales().find_all().await?))
    }

    /// Returns the sale with the given id, if any.
    pub async fn get_sale_by_id(&self, sale_id: i64) -> ServiceResult<Option<SaleDto>> {
        Ok(self.db.sales().find_by_id(sale_id).await?.map(SaleDto::from))
    }

    /// Returns all sales of the given sale type.
    ///
    /// Strict parse: unlike the identifier fallback chain, an unknown name
    /// here is an error.
    pub async fn get_sales_by_sale_type(&self, sale_type: &str) -> ServiceResult<Vec<SaleDto>> {
        let kind = SaleType::from_name(sale_type)
            .ok_or_else(|| ServiceError::UnknownSaleType(sale_type.to_string()))?;

        Ok(translate(self.db.sales().find_by_sale_type(kind).await?))
    }

    /// Returns all sales with the given payment mode.
    ///
    /// Strict parse: an unknown name is an error.
    pub async fn get_sales_by_payment_mode(
        &self,
        payment_mode: &str,
    ) -> ServiceResult<Vec<SaleDto>> {
        let mode = PaymentMode::from_name(payment_mode)
            .ok_or_else(|| ServiceError::UnknownPaymentMode(payment_mode.to_string()))?;

        Ok(translate(self.db.sales().find_by_payment_mode(mode).await?))
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Deletes a sale and its items. Idempotent: deleting an absent id
    /// completes without error.
    pub async fn delete_sale(&self, sale_id: i64) -> ServiceResult<()> {
        self.db.sales().delete_by_id(sale_id).await?;
        info!(sale_id, "Sale deleted");
        Ok(())
    }
}

fn translate(sales: Vec<Sale>) -> Vec<SaleDto> {
    sales.into_iter().map(SaleDto::from).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{CustomerRefDto, ProductRefDto, SaleItemRequest};
    use storeman_core::{Customer, Product};
    use storeman_db::DbConfig;

    async fn test_service() -> SaleService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SaleService::new(db)
    }

    async fn seed_customer(service: &SaleService, name: &str) -> Customer {
        service
            .db
            .customers()
            .insert(name, Some("0300-1234567"), Some("12 Mall Road"))
            .await
            .unwrap()
    }

    async fn seed_product(service: &SaleService, code: &str, stock: i64) -> Product {
        service
            .db
            .products()
            .insert(code, &format!("{code} (test)"), Decimal::from(stock))
            .await
            .unwrap()
    }

    fn item(product: &Product, quantity: i64, price: i64) -> SaleItemRequest {
        SaleItemRequest {
            product: ProductRefDto {
                product_id: product.product_id,
            },
            quantity: Decimal::from(quantity),
            price: Decimal::from(price),
            total_price: Decimal::from(quantity * price),
        }
    }

    fn request(
        customer: &Customer,
        payment_mode: PaymentMode,
        sale_type: SaleType,
        items: Vec<SaleItemRequest>,
    ) -> SaleRequest {
        let gross_total: Decimal = items.iter().map(|i| i.total_price).sum();
        SaleRequest {
            sale_id: None,
            customer: CustomerRefDto {
                customer_id: customer.customer_id,
            },
            sale_date: None,
            payment_mode,
            sale_type,
            gross_total,
            items,
        }
    }

    async fn stock_of(service: &SaleService, product: &Product) -> Decimal {
        service
            .db
            .products()
            .find_by_id(product.product_id)
            .await
            .unwrap()
            .unwrap()
            .quantity
    }

    // -------------------------------------------------------------------------
    // save_sale
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_save_sale_decrements_each_product() {
        let service = test_service().await;
        let customer = seed_customer(&service, "Aaliyah Khan").await;
        let rice = seed_product(&service, "RICE-5KG", 40).await;
        let sugar = seed_product(&service, "SUGAR-1KG", 25).await;

        let dto = service
            .save_sale(request(
                &customer,
                PaymentMode::Cash,
                SaleType::Retail,
                vec![item(&rice, 3, 1299), item(&sugar, 2, 180)],
            ))
            .await
            .unwrap();

        assert_eq!(dto.items.len(), 2);
        assert!(dto.sale_id > 0);
        assert_eq!(dto.customer.as_ref().unwrap().customer_name, "Aaliyah Khan");
        assert_eq!(dto.items[0].product.product_code, "RICE-5KG");

        assert_eq!(stock_of(&service, &rice).await, Decimal::from(37));
        assert_eq!(stock_of(&service, &sugar).await, Decimal::from(23));
    }

    #[tokio::test]
    async fn test_save_sale_defaults_date_and_ignores_caller_sale_id() {
        let service = test_service().await;
        let customer = seed_customer(&service, "Aaliyah Khan").await;
        let rice = seed_product(&service, "RICE-5KG", 10).await;

        let before = chrono::Utc::now();
        let mut req = request(
            &customer,
            PaymentMode::Online,
            SaleType::Retail,
            vec![item(&rice, 1, 1299)],
        );
        req.sale_id = Some(999_999);

        let dto = service.save_sale(req).await.unwrap();

        // Identity came from the store, not the caller
        assert_ne!(dto.sale_id, 999_999);
        // Absent date defaulted to "now"
        assert!(dto.sale_date >= before);
        assert!(dto.sale_date <= chrono::Utc::now());
    }

    #[tokio::test]
    async fn test_save_sale_unknown_customer() {
        let service = test_service().await;
        let rice = seed_product(&service, "RICE-5KG", 10).await;

        let err = service
            .save_sale(SaleRequest {
                sale_id: None,
                customer: CustomerRefDto { customer_id: 404 },
                sale_date: None,
                payment_mode: PaymentMode::Cash,
                sale_type: SaleType::Retail,
                gross_total: Decimal::from(1299),
                items: vec![item(&rice, 1, 1299)],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Core(CoreError::CustomerNotFound(404))
        ));
        // Nothing was written
        assert!(service.get_all_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_sale_unknown_product() {
        let service = test_service().await;
        let customer = seed_customer(&service, "Aaliyah Khan").await;

        let err = service
            .save_sale(SaleRequest {
                sale_id: None,
                customer: CustomerRefDto {
                    customer_id: customer.customer_id,
                },
                sale_date: None,
                payment_mode: PaymentMode::Cash,
                sale_type: SaleType::Retail,
                gross_total: Decimal::from(100),
                items: vec![SaleItemRequest {
                    product: ProductRefDto { product_id: 404 },
                    quantity: Decimal::from(1),
                    price: Decimal::from(100),
                    total_price: Decimal::from(100),
                }],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Core(CoreError::ProductNotFound(404))
        ));
        assert!(service.get_all_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_sale_insufficient_stock_names_product_and_keeps_earlier_deductions() {
        let service = test_service().await;
        let customer = seed_customer(&service, "Aaliyah Khan").await;
        let rice = seed_product(&service, "RICE-5KG", 40).await;
        let sugar = seed_product(&service, "SUGAR-1KG", 3).await;

        let err = service
            .save_sale(request(
                &customer,
                PaymentMode::Cash,
                SaleType::Retail,
                vec![item(&rice, 2, 1299), item(&sugar, 5, 180)],
            ))
            .await
            .unwrap_err();

        match err {
            ServiceError::Core(CoreError::InsufficientStock {
                product,
                available,
                requested,
            }) => {
                assert_eq!(product, "SUGAR-1KG (test)");
                assert_eq!(available, Decimal::from(3));
                assert_eq!(requested, Decimal::from(5));
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Documented gap: the sale is already committed and the first line
        // already deducted; the failing line's product is untouched
        assert_eq!(service.get_all_sales().await.unwrap().len(), 1);
        assert_eq!(stock_of(&service, &rice).await, Decimal::from(38));
        assert_eq!(stock_of(&service, &sugar).await, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_save_sale_duplicate_product_deductions_compound() {
        let service = test_service().await;
        let customer = seed_customer(&service, "Aaliyah Khan").await;
        let rice = seed_product(&service, "RICE-5KG", 10).await;

        // Two lines against the same product: each deduction re-reads the
        // live quantity, so they compound sequentially
        service
            .save_sale(request(
                &customer,
                PaymentMode::Cash,
                SaleType::Retail,
                vec![item(&rice, 3, 1299), item(&rice, 4, 1299)],
            ))
            .await
            .unwrap();

        assert_eq!(stock_of(&service, &rice).await, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_save_sale_exact_stock_is_allowed() {
        let service = test_service().await;
        let customer = seed_customer(&service, "Aaliyah Khan").await;
        let rice = seed_product(&service, "RICE-5KG", 5).await;

        service
            .save_sale(request(
                &customer,
                PaymentMode::Cash,
                SaleType::Retail,
                vec![item(&rice, 5, 1299)],
            ))
            .await
            .unwrap();

        assert_eq!(stock_of(&service, &rice).await, Decimal::ZERO);
    }

    // -------------------------------------------------------------------------
    // Identifier lookups
    // -------------------------------------------------------------------------

    /// Seeds one CASH/RETAIL sale for "Aaliyah Khan" and one ONLINE/WHOLESALE
    /// sale for "Bilal Ahmed"; returns their sale ids.
    async fn seed_two_sales(service: &SaleService) -> (i64, i64) {
        let aaliyah = seed_customer(service, "Aaliyah Khan").await;
        let bilal = seed_customer(service, "Bilal Ahmed").await;
        let rice = seed_product(service, "RICE-5KG", 100).await;

        let first = service
            .save_sale(request(
                &aaliyah,
                PaymentMode::Cash,
                SaleType::Retail,
                vec![item(&rice, 1, 1299)],
            ))
            .await
            .unwrap();
        let second = service
            .save_sale(request(
                &bilal,
                PaymentMode::Online,
                SaleType::Wholesale,
                vec![item(&rice, 10, 1199)],
            ))
            .await
            .unwrap();

        (first.sale_id, second.sale_id)
    }

    #[tokio::test]
    async fn test_find_by_identifier_numeric_id() {
        let service = test_service().await;
        let (first_id, _) = seed_two_sales(&service).await;

        let found = service
            .find_by_identifier(&first_id.to_string())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sale_id, first_id);

        // Numeric but absent: the id branch is terminal, result is empty
        assert!(service.find_by_identifier("424242").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_identifier_payment_mode() {
        let service = test_service().await;
        let (first_id, _) = seed_two_sales(&service).await;

        let found = service.find_by_identifier("CASH").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sale_id, first_id);

        // Case-insensitive
        let found = service.find_by_identifier("cash").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_identifier_sale_type() {
        let service = test_service().await;
        let (_, second_id) = seed_two_sales(&service).await;

        let found = service.find_by_identifier("wholesale").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sale_id, second_id);
    }

    #[tokio::test]
    async fn test_find_by_identifier_customer_name_fallback() {
        let service = test_service().await;
        let (first_id, _) = seed_two_sales(&service).await;

        // Not an id, not an enum name: substring-matches "Aaliyah"
        let found = service.find_by_identifier("ali").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sale_id, first_id);

        // The fallback always executes and may match nothing
        assert!(service.find_by_identifier("zubair").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_single_and_first_match_variants() {
        let service = test_service().await;
        let (first_id, _) = seed_two_sales(&service).await;

        let single = service
            .find_single_by_identifier("CASH")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(single.sale_id, first_id);

        let first_match = service
            .find_first_match_by_identifier("CASH")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first_match.sale_id, first_id);

        assert!(service
            .find_single_by_identifier("zubair")
            .await
            .unwrap()
            .is_none());
    }

    // -------------------------------------------------------------------------
    // Plain lookups and deletion
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_all_and_get_by_id() {
        let service = test_service().await;
        let (first_id, second_id) = seed_two_sales(&service).await;

        let all = service.get_all_sales().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sale_id, first_id);
        assert_eq!(all[1].sale_id, second_id);

        let one = service.get_sale_by_id(first_id).await.unwrap().unwrap();
        assert_eq!(one.sale_id, first_id);
        assert!(service.get_sale_by_id(424242).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_strict_lookups_parse_case_insensitively() {
        let service = test_service().await;
        seed_two_sales(&service).await;

        assert_eq!(
            service.get_sales_by_payment_mode("cash").await.unwrap().len(),
            1
        );
        assert_eq!(
            service.get_sales_by_sale_type("Wholesale").await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_strict_lookups_reject_unknown_names() {
        let service = test_service().await;

        let err = service
            .get_sales_by_payment_mode("NOT_A_MODE")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownPaymentMode(name) if name == "NOT_A_MODE"));

        let err = service.get_sales_by_sale_type("RETURNS").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownSaleType(name) if name == "RETURNS"));
    }

    #[tokio::test]
    async fn test_delete_sale_is_idempotent() {
        let service = test_service().await;
        let (first_id, _) = seed_two_sales(&service).await;

        service.delete_sale(first_id).await.unwrap();
        assert!(service.get_sale_by_id(first_id).await.unwrap().is_none());

        // Absent id: completes without error
        service.delete_sale(first_id).await.unwrap();
        service.delete_sale(424242).await.unwrap();

        assert_eq!(service.get_all_sales().await.unwrap().len(), 1);
    }
}
