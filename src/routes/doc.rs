use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::{CatalogProduct, Specification, image::ImageUpload},
    dto::{
        admin::{
            CategoryList, CreateCategoryRequest, CreateNotebookRequest, CreateSmartphoneRequest,
            ProductBase, UpdateOrderStatusRequest,
        },
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredAccount},
        cart::{CartLineView, CartView, ChangeQuantityRequest},
        catalog::{CategoryPage, HomePage, ProductPage, SidebarCategory},
        orders::{CheckoutForm, CheckoutRequest, OrderList, OrderWithCart},
    },
    entity::orders::{DeliveryType, OrderStatus},
    models::{Cart, CartLineItem, Category, Customer, Order, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, orders, params, storefront},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::login,
        auth::register,
        storefront::home,
        storefront::product_detail,
        storefront::category_detail,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::change_quantity,
        cart::checkout,
        cart::make_order,
        orders::list_orders,
        orders::get_order,
        admin::list_categories,
        admin::create_category,
        admin::create_notebook,
        admin::create_smartphone,
        admin::delete_product,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status
    ),
    components(
        schemas(
            User,
            Customer,
            Category,
            Cart,
            CartLineItem,
            Order,
            OrderStatus,
            DeliveryType,
            CatalogProduct,
            Specification,
            ImageUpload,
            SidebarCategory,
            HomePage,
            ProductPage,
            CategoryPage,
            CartView,
            CartLineView,
            ChangeQuantityRequest,
            CheckoutRequest,
            CheckoutForm,
            OrderList,
            OrderWithCart,
            RegisterRequest,
            RegisteredAccount,
            LoginRequest,
            LoginResponse,
            CategoryList,
            CreateCategoryRequest,
            ProductBase,
            CreateNotebookRequest,
            CreateSmartphoneRequest,
            UpdateOrderStatusRequest,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<HomePage>,
            ApiResponse<OrderWithCart>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Storefront", description = "Home, product and category pages"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order endpoints"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_storefront_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/products/{variant}/{slug}/",
            "/add-to-cart/{variant}/{slug}/",
            "/change_quantity/{variant}/{slug}",
            "/make-order/",
            "/api/admin/orders/{id}/status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
