//! Typed wrappers over the storefront's REST resources.
//!
//! Each wrapper borrows the client and goes through [`ApiClient::request`],
//! so resource calls get the same refresh-and-replay treatment as raw ones.

mod categories;
mod orders;
mod products;
mod users;

pub use categories::Categories;
pub use orders::Orders;
pub use products::Products;
pub use users::Users;

use crate::client::ApiClient;

impl ApiClient {
    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn categories(&self) -> Categories<'_> {
        Categories::new(self)
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }
}
