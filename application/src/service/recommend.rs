use kernel::interface::recommend::{DependOnRecommender, RecommendationRequest, Recommender};

use crate::state::DependOnStoreState;

static LIBRARIAN_INSTRUCTION: &str = "You are The Librarian, the in-house book expert of the \
Bookgram marketplace. Recommend two or three books from the provided catalogue and nothing \
outside it, mention whether each pick is available to buy or to rent, and keep the tone warm \
and concise.";

static LIBRARIAN_FALLBACK: &str = "Sorry, I couldn't reach the library just now. Please try \
again in a moment.";

#[async_trait::async_trait]
pub trait RecommendService:
    'static + Sync + Send + DependOnRecommender + DependOnStoreState
{
    /// One attempt per question, no retry; any failure degrades to a fixed
    /// apology so the storefront never breaks on the model's account.
    async fn recommend_books(&self, question: &str) -> String {
        let catalogue = self
            .store_state()
            .books()
            .iter()
            .map(|book| {
                format!(
                    "- {} by {} ({}, average rating {})",
                    book.title().as_ref(),
                    book.author(),
                    book.category(),
                    book.average_rating().as_ref()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!("Catalogue:\n{catalogue}\n\nReader question: {question}");
        let request = RecommendationRequest::new(prompt, LIBRARIAN_INSTRUCTION);
        match self.recommender().recommend(&request).await {
            Ok(text) => text,
            Err(report) => {
                tracing::warn!("recommendation failed: {report:?}");
                LIBRARIAN_FALLBACK.to_string()
            }
        }
    }
}

impl<T> RecommendService for T where T: DependOnRecommender + DependOnStoreState {}

#[cfg(test)]
mod test {
    use crate::service::mock::{sample_book, MockApp};
    use crate::service::RecommendService;

    #[tokio::test]
    async fn answer_passes_through_on_success() {
        let mut app = MockApp::new();
        app.seed_books(vec![sample_book(3, 350, 50, None)]);
        app.recommender.reply("Try Hyperion.");
        assert_eq!(app.recommend_books("something epic").await, "Try Hyperion.");
        let prompt = app.recommender.last_prompt().unwrap();
        assert!(prompt.contains("Hyperion"));
        assert!(prompt.contains("something epic"));
    }

    #[tokio::test]
    async fn failure_degrades_to_the_fixed_apology() {
        let app = MockApp::new();
        app.recommender.fail();
        let answer = app.recommend_books("anything").await;
        assert!(answer.starts_with("Sorry"));
    }
}
