//! Order forms and the replies that reference them.

mod extractor;
pub mod form;

pub use extractor::{extract_orders, Order};
pub use form::{parse_order_form, FormField, OrderForm};
