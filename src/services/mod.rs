pub mod consumer;
pub mod evaluator;
pub mod range_provider;
pub mod resolver;

pub use consumer::ChangeConsumer;
pub use evaluator::PulseEvaluator;
pub use range_provider::{RangeProviderService, RangeRegistry, RangeResponse};
pub use resolver::{HttpRangeResolver, RangeResolver};
