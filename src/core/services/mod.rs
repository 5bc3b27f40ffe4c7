pub mod balance_service;
pub mod report_service;
pub mod statement_service;
pub mod transaction_service;

pub use balance_service::{BalanceService, Dashboard, DashboardTotals, PartySummary};
pub use report_service::{MonthlyReport, ReportService};
pub use statement_service::{Statement, StatementRow, StatementService};
pub use transaction_service::TransactionService;
