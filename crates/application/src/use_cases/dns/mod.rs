mod resolve_query;

pub use resolve_query::{
    LocalAnswer, Resolution, ResolutionOutcome, ResolveQueryUseCase, FALLBACK_TTL,
    LOCAL_ANSWER_TTL,
};
