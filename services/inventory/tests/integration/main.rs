mod helpers;

mod audit_test;
mod auth_test;
mod movement_test;
mod product_test;
