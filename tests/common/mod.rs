pub mod builders;
pub mod mock_executor;
pub mod strategies;
