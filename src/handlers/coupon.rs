use crate::error::AppError;
use crate::models::*;
use crate::services::CouponService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/coupons",
    tag = "coupon",
    responses(
        (status = 200, description = "All active coupons", body = [Coupon])
    )
)]
pub async fn get_active_coupons(coupon_service: web::Data<CouponService>) -> Result<HttpResponse> {
    match coupon_service.list_active_coupons().await {
        Ok(coupons) => Ok(HttpResponse::Ok().json(coupons)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/coupons/{code}",
    tag = "coupon",
    params(
        ("code" = String, Path, description = "Coupon code, matched exactly")
    ),
    responses(
        (status = 200, description = "Active coupon", body = Coupon),
        (status = 404, description = "No active coupon with this code")
    )
)]
pub async fn get_coupon_by_code(
    coupon_service: web::Data<CouponService>,
    code: web::Path<String>,
) -> Result<HttpResponse> {
    match coupon_service.get_coupon_by_code(&code).await {
        Ok(Some(coupon)) => Ok(HttpResponse::Ok().json(coupon)),
        Ok(None) => Ok(HttpResponse::NotFound().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/coupons/validate",
    tag = "coupon",
    request_body = ValidateCouponRequest,
    responses(
        (status = 200, description = "Validation outcome; unknown codes report valid=false", body = ValidateCouponResponse),
        (status = 400, description = "Missing or non-numeric input", body = ErrorResponse)
    )
)]
pub async fn validate_coupon(
    coupon_service: web::Data<CouponService>,
    request: web::Json<ValidateCouponRequest>,
) -> Result<HttpResponse> {
    match coupon_service.validate_coupon(request.into_inner()).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ValidateCouponResponse::from(outcome))),
        Err(e) => Ok(e.error_response()),
    }
}

/// Malformed bodies are reported like any other invalid argument.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidArgument(err.to_string()).into())
}

pub fn coupon_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/coupons")
            .route("", web::get().to(get_active_coupons))
            .route("/validate", web::post().to(validate_coupon))
            .route("/{code}", web::get().to(get_coupon_by_code)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockCouponStore;
    use crate::entities::DiscountType;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use std::sync::Arc;

    fn save10() -> Coupon {
        let now = Utc::now();
        Coupon {
            id: 1,
            code: "SAVE10".to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            min_order_amount: Decimal::from(50),
            max_discount_amount: Some(Decimal::from(20)),
            usage_limit: None,
            used_count: 0,
            valid_from: None,
            valid_until: now + Duration::days(365),
            active: true,
            created_at: now,
        }
    }

    fn store_with_save10() -> MockCouponStore {
        let mut store = MockCouponStore::new();
        store
            .expect_find_active_by_code()
            .returning(|code| Ok((code == "SAVE10").then(save10)));
        store.expect_list_active().returning(|| Ok(vec![save10()]));
        store
    }

    macro_rules! app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(CouponService::new(Arc::new($store))))
                    .app_data(json_config())
                    .service(web::scope("/api").configure(coupon_config)),
            )
            .await
        };
    }

    fn decimal(value: &Value) -> Decimal {
        Decimal::from_str(&value.to_string()).unwrap()
    }

    #[actix_web::test]
    async fn test_list_active_coupons() {
        let app = app!(store_with_save10());
        let req = test::TestRequest::get().uri("/api/coupons").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let coupons = body.as_array().unwrap();
        assert_eq!(coupons.len(), 1);
        assert_eq!(coupons[0]["code"], "SAVE10");
        assert_eq!(coupons[0]["discountType"], "PERCENTAGE");
        assert_eq!(decimal(&coupons[0]["maxDiscountAmount"]), Decimal::from(20));
        assert!(coupons[0]["validFrom"].is_null());
    }

    #[actix_web::test]
    async fn test_get_coupon_by_code() {
        let app = app!(store_with_save10());

        let req = test::TestRequest::get().uri("/api/coupons/SAVE10").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], "SAVE10");

        let req = test::TestRequest::get().uri("/api/coupons/MISSING").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(test::read_body(resp).await.is_empty());
    }

    #[actix_web::test]
    async fn test_validate_found_coupon() {
        let app = app!(store_with_save10());
        let req = test::TestRequest::post()
            .uri("/api/coupons/validate")
            .set_json(json!({"code": "SAVE10", "orderAmount": 200}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["coupon"]["code"], "SAVE10");
        assert_eq!(decimal(&body["discount"]), Decimal::from(20));
        assert!(body.get("message").is_none());
    }

    #[actix_web::test]
    async fn test_validate_below_minimum() {
        let app = app!(store_with_save10());
        let req = test::TestRequest::post()
            .uri("/api/coupons/validate")
            .set_json(json!({"code": "SAVE10", "orderAmount": "30"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["valid"], false);
        assert_eq!(decimal(&body["discount"]), Decimal::from(3));
    }

    #[actix_web::test]
    async fn test_validate_unknown_code() {
        let app = app!(store_with_save10());
        let req = test::TestRequest::post()
            .uri("/api/coupons/validate")
            .set_json(json!({"code": "BOGUS", "orderAmount": "200"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"valid": false, "message": "Invalid coupon code"}));
    }

    #[actix_web::test]
    async fn test_validate_rejects_malformed_input() {
        let mut store = MockCouponStore::new();
        store.expect_find_active_by_code().never();
        let app = app!(store);

        for payload in [
            json!({"code": "SAVE10", "orderAmount": "lots"}),
            json!({"code": "SAVE10"}),
            json!({"orderAmount": 100}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/coupons/validate")
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{payload}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
        }

        let req = test::TestRequest::post()
            .uri("/api/coupons/validate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
