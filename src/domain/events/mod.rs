//! Domain events

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug)]
pub enum ProductEvent {
    Created { product_id: String },
    Updated { product_id: String },
    Deleted { product_id: String },
}

#[derive(Clone, Debug)]
pub enum OrderEvent {
    Placed { order_id: String, final_total: i64 },
    Canceled { order_id: String },
}
