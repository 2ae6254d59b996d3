use destructure::Destructure;
use vodca::References;

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct RecommendationRequest {
    prompt: String,
    system_instruction: String,
}

impl RecommendationRequest {
    pub fn new(prompt: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
        }
    }
}

/// Generative recommendation collaborator. One attempt per request, no
/// retry; callers degrade failures to a displayable fallback instead of
/// treating them as fatal.
#[async_trait::async_trait]
pub trait Recommender: 'static + Sync + Send {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> error_stack::Result<String, KernelError>;
}

pub trait DependOnRecommender: 'static + Sync + Send {
    type Recommender: Recommender;
    fn recommender(&self) -> &Self::Recommender;
}
