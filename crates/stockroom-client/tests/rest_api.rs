//! Integration tests for the REST collaborators against a mock backend.

use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockroom_client::config::{ApiSettings, MarginSettings};
use stockroom_client::margin::FALLBACK_NOTE;
use stockroom_client::{
    ClientError, MarginCalculator, MarginUpdate, ProductService, RestClient, VatRateRegistry,
};
use stockroom_core::{
    CalculationMethod, Money, PriceSide, ProductForm, ProductId, ProductMeta, ProductPriceState,
    TaxRate,
};

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let client = RestClient::new(&ApiSettings {
        base_url: format!("{}/api", server.uri()),
        ..ApiSettings::default()
    })
    .unwrap();
    (server, client)
}

fn priced(sell: i64, buy: i64) -> ProductPriceState {
    ProductPriceState::with_tax_rate(TaxRate::from_bps(2300))
        .set_net(PriceSide::Sale, Money::from_cents(sell))
        .set_net(PriceSide::Purchase, Money::from_cents(buy))
}

fn remote_settings(remote_for_unsaved: bool) -> MarginSettings {
    MarginSettings {
        remote_enabled: true,
        remote_for_unsaved,
    }
}

// =============================================================================
// VAT Rates
// =============================================================================

#[tokio::test]
async fn vat_rates_are_loaded_from_backend() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/vat-rates"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rates": [
                { "id": 1, "rate": 23, "description": "Standard" },
                { "id": 2, "rate": 7, "description": "Reduced" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rates = VatRateRegistry::new(client).load().await;

    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0].id, "1");
    assert_eq!(rates[1].rate.bps(), 700);
    assert_eq!(rates[1].description, "Reduced");
}

#[tokio::test]
async fn vat_rates_fall_back_on_server_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/vat-rates"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let rates = VatRateRegistry::new(client).load().await;
    let bps: Vec<u32> = rates.iter().map(|r| r.rate.bps()).collect();
    assert_eq!(bps, vec![2300, 800, 500, 0]);
}

#[tokio::test]
async fn vat_rates_fall_back_on_empty_or_invalid_list() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/vat-rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rates": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vat-rates"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "rates": [{ "id": 1, "rate": 230 }] })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vat-rates"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let registry = VatRateRegistry::new(client);
    for _ in 0..3 {
        let rates = registry.load().await;
        assert_eq!(rates.len(), 4);
        assert_eq!(rates[0].rate, registry.default_rate());
    }
}

// =============================================================================
// Margin
// =============================================================================

#[tokio::test]
async fn product_margin_is_computed_remotely() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/products/42/margin"))
        .and(header_exists("x-request-id"))
        .and(body_json(json!({ "sellPrice": 150.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "marginPercent": 30.5,
            "markupPercent": 43.88,
            "profitAmount": 45.75,
            "calculationMethod": "product"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calculator = MarginCalculator::from_settings(client, &remote_settings(false));
    let id = ProductId::new("42");
    let update = calculator.recompute(&priced(15000, 10000), Some(&id)).await.unwrap();

    let MarginUpdate::Applied(Some(result)) = update else {
        panic!("expected a margin");
    };
    assert_eq!(result.calculation_method, CalculationMethod::Remote);
    assert_eq!(result.margin_percent.bps(), 3050);
    assert_eq!(result.markup_percent.bps(), 4388);
    assert_eq!(result.profit_amount.cents(), 4575);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn unsaved_product_margin_stays_local() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let calculator = MarginCalculator::from_settings(client, &remote_settings(false));
    let update = calculator.recompute(&priced(15000, 10000), None).await.unwrap();

    let MarginUpdate::Applied(Some(result)) = update else {
        panic!("expected a margin");
    };
    assert_eq!(result.calculation_method, CalculationMethod::Local);
    assert_eq!(result.margin_percent.bps(), 3333);
    assert_eq!(result.markup_percent.bps(), 5000);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn unsaved_product_margin_can_use_backend() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/margin/calculate"))
        .and(body_json(json!({ "sellPrice": 150.0, "buyPrice": 100.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "marginPercent": 33.33,
            "markupPercent": 50,
            "profitAmount": 50
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calculator = MarginCalculator::from_settings(client, &remote_settings(true));
    calculator.recompute(&priced(15000, 10000), None).await.unwrap();

    let result = calculator.current().await.unwrap();
    assert_eq!(result.calculation_method, CalculationMethod::Remote);
    assert_eq!(result.profit_amount.cents(), 5000);
}

#[tokio::test]
async fn failed_remote_margin_falls_back_with_note() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/products/42/margin"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&server)
        .await;

    let calculator = MarginCalculator::from_settings(client, &remote_settings(false));
    let id = ProductId::new("42");
    calculator.recompute(&priced(15000, 10000), Some(&id)).await.unwrap();

    let result = calculator.current().await.unwrap();
    assert_eq!(result.calculation_method, CalculationMethod::Local);
    assert_eq!(result.margin_percent.bps(), 3333);
    assert_eq!(result.error.as_deref(), Some(FALLBACK_NOTE));
}

#[tokio::test]
async fn remote_disabled_never_calls_backend() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = MarginSettings {
        remote_enabled: false,
        remote_for_unsaved: true,
    };
    let calculator = MarginCalculator::from_settings(client, &settings);
    let id = ProductId::new("42");
    calculator.recompute(&priced(15000, 10000), Some(&id)).await.unwrap();

    assert_eq!(
        calculator.current().await.map(|r| r.calculation_method),
        Some(CalculationMethod::Local)
    );
}

// =============================================================================
// Products
// =============================================================================

fn form() -> ProductForm {
    ProductForm {
        meta: ProductMeta {
            name: "Cola 330ml".into(),
            product_code: "COLA-330".into(),
            barcode: "5901234123457".into(),
            ..Default::default()
        },
        prices: priced(10000, 6000),
    }
}

#[tokio::test]
async fn existing_product_is_updated_with_put() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/api/products/42"))
        .and(header_exists("x-request-id"))
        .and(body_json(json!({
            "id": "42",
            "name": "Cola 330ml",
            "productCode": "COLA-330",
            "barcode": "5901234123457",
            "netSale": 100.0,
            "grossSale": 123.0,
            "netPurchase": 60.0,
            "grossPurchase": 73.8,
            "taxRate": 23.0
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let id = ProductId::new("42");
    let saved = ProductService::new(client).save(Some(&id), &form()).await.unwrap();
    assert_eq!(saved, id);
}

#[tokio::test]
async fn new_product_is_created_with_post() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = ProductService::new(client).save(None, &form()).await.unwrap();
    assert_eq!(saved.as_str(), "7");
}

#[tokio::test]
async fn rejected_save_carries_server_message() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/api/products/42"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Barcode already in use" })),
        )
        .mount(&server)
        .await;

    let err = ProductService::new(client)
        .save(Some(&ProductId::new("42")), &form())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected { status: 409, .. }));
    assert_eq!(err.user_message(), "Barcode already in use");
}

#[tokio::test]
async fn product_is_fetched_for_editing() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/products/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Cola 330ml",
            "barcode": "5901234123457",
            "unit": "szt",
            "netSale": 100,
            "grossSale": 108,
            "netPurchase": 60,
            "grossPurchase": 64.8,
            "taxRate": 8
        })))
        .mount(&server)
        .await;

    let form = ProductService::new(client)
        .fetch(&ProductId::new("42"))
        .await
        .unwrap();

    assert_eq!(form.meta.name, "Cola 330ml");
    assert_eq!(form.meta.unit.as_deref(), Some("szt"));
    assert_eq!(form.prices.tax_rate.bps(), 800);
    assert_eq!(form.prices.gross_sale.cents(), 10800);
    assert_eq!(form.prices.gross_purchase.cents(), 6480);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = RestClient::new(&ApiSettings {
        base_url: format!("http://127.0.0.1:{port}/api"),
        ..ApiSettings::default()
    })
    .unwrap();
    let err = ProductService::new(client)
        .fetch(&ProductId::new("1"))
        .await
        .unwrap_err();

    assert!(err.is_transport_error());
}
