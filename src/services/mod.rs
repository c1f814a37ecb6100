pub mod comparison;
pub mod csv_import;
pub mod discount;
pub mod pricing;
pub mod verification;
