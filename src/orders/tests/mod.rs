use crate::models::{CartItem, Product, User};
use crate::notify::Notifier;
use crate::orders::OrderService;
use crate::storage::Storage;
use rust_decimal::Decimal;

mod test_status;

fn create_test_service() -> OrderService {
    let storage = Storage::open_in_memory().unwrap();
    OrderService::new(storage, Notifier::new())
}

fn seed_user(service: &OrderService, id: &str) {
    service
        .storage()
        .put_user(&User {
            id: id.to_string(),
            name: format!("User {}", id),
            phone_number: None,
        })
        .unwrap();
}

fn seed_product(service: &OrderService, id: &str, name: &str, price_cents: i64, stock: u32) {
    service
        .storage()
        .put_product(&Product {
            id: id.to_string(),
            name: name.to_string(),
            unit_price: Decimal::new(price_cents, 2),
            stock,
        })
        .unwrap();
}

fn seed_cart_item(service: &OrderService, id: &str, user_id: &str, product_id: &str, quantity: u32) {
    service
        .storage()
        .put_cart_item(&CartItem {
            id: id.to_string(),
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
        })
        .unwrap();
}

fn stock_of(service: &OrderService, product_id: &str) -> u32 {
    service
        .storage()
        .get_product(product_id)
        .unwrap()
        .unwrap()
        .stock
}
