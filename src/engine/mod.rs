//! # Extraction Engine
//!
//! Reduces site workbooks to KPI records and records to a portfolio:
//!
//! - [`coerce`]: cell values to non-negative quantities
//! - [`classify`]: rows to resource categories by description keywords
//! - [`select`]: the data sheet of a workbook
//! - [`series`]: twelve monthly columns of a row
//! - [`emission`]: emission factors and scopes
//! - [`metadata`]: region, technology and capacity from file names
//! - [`site`]: one workbook to one [`site::SiteRecord`]
//! - [`portfolio`]: site records to a [`portfolio::PortfolioSummary`]
//! - [`batch`]: many files in parallel, tolerating failures
pub mod batch;
pub mod classify;
pub mod coerce;
pub mod emission;
pub mod metadata;
pub mod portfolio;
pub mod select;
pub mod series;
pub mod site;
