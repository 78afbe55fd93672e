use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::DiscountType;
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::coupon::get_active_coupons,
        handlers::coupon::get_coupon_by_code,
        handlers::coupon::validate_coupon,
    ),
    components(
        schemas(
            Coupon,
            DiscountType,
            ValidateCouponRequest,
            ValidateCouponResponse,
            ErrorResponse,
            ApiError,
        )
    ),
    tags(
        (name = "coupon", description = "Coupon lookup and validation API"),
    ),
    info(
        title = "Coupon Service API",
        version = "1.0.0",
        description = "Coupon lookup and validation REST API documentation",
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
