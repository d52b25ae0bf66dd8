pub mod audit_logs;
pub mod cart_line_items;
pub mod carts;
pub mod categories;
pub mod customers;
pub mod notebooks;
pub mod orders;
pub mod smartphones;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_line_items::Entity as CartLineItems;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use customers::Entity as Customers;
pub use notebooks::Entity as Notebooks;
pub use orders::Entity as Orders;
pub use smartphones::Entity as Smartphones;
pub use users::Entity as Users;
