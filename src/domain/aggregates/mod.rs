pub mod cart;
pub mod order;
pub mod product;

pub use cart::{AddOutcome, Cart, CartLine};
pub use order::{Order, OrderDetail, OrderItem, OrderLedger, OrderStatus};
pub use product::{Catalog, ColorOption, NewProduct, Product, ProductOptions, ProductPatch, ProductStatus};
