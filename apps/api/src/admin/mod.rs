// Platform administration: overview of companies and admins, and
// provisioning of company accounts and new admins.

pub mod console;
pub mod handlers;
pub mod store;
