//! In-memory collaborators for service tests. Every repository records the
//! writes it receives so a test can assert what reached the store, and every
//! one can be told to fail its next calls.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use error_stack::Report;
use uuid::Uuid;

use kernel::interface::auth::{
    AuthProvider, AuthSession, DependOnAuthProvider, SignUpOutcome,
};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{
    BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery, DependOnForumQuery,
    DependOnUserQuery, ForumQuery, UserQuery,
};
use kernel::interface::recommend::{DependOnRecommender, RecommendationRequest, Recommender};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
    DependOnForumModifier, DependOnInquiryModifier, DependOnOrderModifier, DependOnUserModifier,
    ForumModifier, InquiryModifier, OrderModifier, UserModifier,
};
use kernel::prelude::entity::{
    AverageRating, Book, BookId, BookTitle, CartItem, CartItemId, CreatedAt, ForumPost,
    ForumPostId, ForumReply, ForumReplyId, Inquiry, Order, Price, Review, Stock, User, UserId,
    UserName,
};
use kernel::KernelError;

use crate::state::{DependOnStoreState, StoreState};

fn unreachable_store() -> Report<KernelError> {
    Report::new(KernelError::Internal).attach_printable("the record store is unreachable")
}

pub(crate) fn sample_book(stock: i32, buy: i64, rent: i64, deposit: Option<i64>) -> Book {
    Book::new(
        BookId::new(Uuid::new_v4()),
        BookTitle::new("Hyperion"),
        "Dan Simmons",
        "Seven pilgrims tell their tales on the way to the Time Tombs.",
        "Science Fiction",
        Price::new(500),
        Price::new(buy),
        Price::new(rent),
        deposit.map(Price::new),
        Stock::new(stock),
        "https://example.com/hyperion.jpg",
        vec![],
        vec![],
        AverageRating::new(0.0),
        None,
        CreatedAt::now(),
    )
}

/// Puts a signed-in user directly into the state, bypassing the auth
/// provider, and hands back a copy for assertions.
pub(crate) fn signed_in(app: &mut MockApp) -> User {
    let user = User::from_session(
        UserId::new(Uuid::new_v4()),
        UserName::new("asha"),
        "asha@example.com",
    );
    app.state.set_user(Some(user.clone()));
    user
}

#[derive(Default)]
pub(crate) struct MockApp {
    pub(crate) database: MockDatabase,
    pub(crate) books: MockBookRepository,
    pub(crate) carts: MockCartRepository,
    pub(crate) profiles: MockProfileRepository,
    pub(crate) orders: MockOrderRepository,
    pub(crate) forum: MockForumRepository,
    pub(crate) inquiries: MockInquiryRepository,
    pub(crate) auth: MockAuthProvider,
    pub(crate) recommender: MockRecommender,
    state: StoreState,
}

impl MockApp {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> &StoreState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut StoreState {
        &mut self.state
    }

    /// Seeds the local catalogue only; `books.seed` feeds the repository.
    pub(crate) fn seed_books(&mut self, books: Vec<Book>) {
        self.state.replace_books(books);
    }
}

impl DependOnStoreState for MockApp {
    fn store_state(&self) -> &StoreState {
        &self.state
    }

    fn store_state_mut(&mut self) -> &mut StoreState {
        &mut self.state
    }
}

impl DependOnDatabaseConnection<()> for MockApp {
    type DatabaseConnection = MockDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnBookQuery<()> for MockApp {
    type BookQuery = MockBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &self.books
    }
}

impl DependOnBookModifier<()> for MockApp {
    type BookModifier = MockBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

impl DependOnCartQuery<()> for MockApp {
    type CartQuery = MockCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &self.carts
    }
}

impl DependOnCartModifier<()> for MockApp {
    type CartModifier = MockCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &self.carts
    }
}

impl DependOnUserQuery<()> for MockApp {
    type UserQuery = MockProfileRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &self.profiles
    }
}

impl DependOnUserModifier<()> for MockApp {
    type UserModifier = MockProfileRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &self.profiles
    }
}

impl DependOnOrderModifier<()> for MockApp {
    type OrderModifier = MockOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &self.orders
    }
}

impl DependOnForumQuery<()> for MockApp {
    type ForumQuery = MockForumRepository;
    fn forum_query(&self) -> &Self::ForumQuery {
        &self.forum
    }
}

impl DependOnForumModifier<()> for MockApp {
    type ForumModifier = MockForumRepository;
    fn forum_modifier(&self) -> &Self::ForumModifier {
        &self.forum
    }
}

impl DependOnInquiryModifier<()> for MockApp {
    type InquiryModifier = MockInquiryRepository;
    fn inquiry_modifier(&self) -> &Self::InquiryModifier {
        &self.inquiries
    }
}

impl DependOnAuthProvider for MockApp {
    type AuthProvider = MockAuthProvider;
    fn auth_provider(&self) -> &Self::AuthProvider {
        &self.auth
    }
}

impl DependOnRecommender for MockApp {
    type Recommender = MockRecommender;
    fn recommender(&self) -> &Self::Recommender {
        &self.recommender
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockDatabase;

#[async_trait::async_trait]
impl DatabaseConnection<()> for MockDatabase {
    async fn acquire(&self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockBookRepository {
    inner: Arc<BookInner>,
}

#[derive(Default)]
struct BookInner {
    books: Mutex<Vec<Book>>,
    stock_writes: Mutex<Vec<(BookId, Stock)>>,
    review_writes: AtomicUsize,
    fail_query: AtomicBool,
    fail_create: AtomicBool,
    fail_reviews: AtomicBool,
}

impl MockBookRepository {
    pub(crate) fn seed(&self, books: Vec<Book>) {
        *self.inner.books.lock().unwrap() = books;
    }

    pub(crate) fn fail_query(&self) {
        self.inner.fail_query.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_create(&self) {
        self.inner.fail_create.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_reviews(&self) {
        self.inner.fail_reviews.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stock_writes(&self) -> Vec<(BookId, Stock)> {
        self.inner.stock_writes.lock().unwrap().clone()
    }

    pub(crate) fn review_writes(&self) -> usize {
        self.inner.review_writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BookQuery<()> for MockBookRepository {
    async fn find_all(&self, _con: &mut ()) -> error_stack::Result<Vec<Book>, KernelError> {
        if self.inner.fail_query.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        Ok(self.inner.books.lock().unwrap().clone())
    }

    async fn find_by_id(
        &self,
        _con: &mut (),
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        if self.inner.fail_query.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        let books = self.inner.books.lock().unwrap();
        Ok(books.iter().find(|book| book.id() == id).cloned())
    }
}

#[async_trait::async_trait]
impl BookModifier<()> for MockBookRepository {
    async fn create(&self, _con: &mut (), book: &Book) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_create.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        self.inner.books.lock().unwrap().insert(0, book.clone());
        Ok(())
    }

    async fn update_stock(
        &self,
        _con: &mut (),
        id: &BookId,
        stock: &Stock,
    ) -> error_stack::Result<(), KernelError> {
        self.inner
            .stock_writes
            .lock()
            .unwrap()
            .push((id.clone(), *stock));
        Ok(())
    }

    async fn update_reviews(
        &self,
        _con: &mut (),
        _id: &BookId,
        _reviews: &[Review],
        _average: &AverageRating,
    ) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_reviews.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        self.inner.review_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockCartRepository {
    inner: Arc<CartInner>,
}

#[derive(Default)]
struct CartInner {
    lines: Mutex<Vec<(UserId, CartItem)>>,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockCartRepository {
    pub(crate) fn fail_insert(&self) {
        self.inner.fail_insert.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_delete(&self) {
        self.inner.fail_delete.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stored_lines(&self) -> Vec<(UserId, CartItem)> {
        self.inner.lines.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CartQuery<()> for MockCartRepository {
    async fn find_by_user(
        &self,
        _con: &mut (),
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        let lines = self.inner.lines.lock().unwrap();
        Ok(lines
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, item)| item.clone())
            .collect())
    }
}

#[async_trait::async_trait]
impl CartModifier<()> for MockCartRepository {
    async fn insert(
        &self,
        _con: &mut (),
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<CartItemId, KernelError> {
        if self.inner.fail_insert.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        let issued = CartItemId::new(Uuid::new_v4());
        self.inner
            .lines
            .lock()
            .unwrap()
            .push((user_id.clone(), item.clone().with_id(issued.clone())));
        Ok(issued)
    }

    async fn update_pricing(
        &self,
        _con: &mut (),
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        let mut lines = self.inner.lines.lock().unwrap();
        for line in lines.iter_mut() {
            if line.1.id() == item.id() {
                line.1 = item.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, _con: &mut (), id: &CartItemId) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_delete.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        self.inner
            .lines
            .lock()
            .unwrap()
            .retain(|(_, item)| item.id() != id);
        Ok(())
    }

    async fn clear(&self, _con: &mut (), user_id: &UserId) -> error_stack::Result<(), KernelError> {
        self.inner
            .lines
            .lock()
            .unwrap()
            .retain(|(owner, _)| owner != user_id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockProfileRepository {
    inner: Arc<ProfileInner>,
}

#[derive(Default)]
struct ProfileInner {
    profiles: Mutex<Vec<User>>,
    upserts: AtomicUsize,
    fail_query: AtomicBool,
    fail_upsert: AtomicBool,
}

impl MockProfileRepository {
    pub(crate) fn fail_query(&self) {
        self.inner.fail_query.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_upsert(&self) {
        self.inner.fail_upsert.store(true, Ordering::SeqCst);
    }

    pub(crate) fn upserts(&self) -> usize {
        self.inner.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserQuery<()> for MockProfileRepository {
    async fn find_by_id(
        &self,
        _con: &mut (),
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        if self.inner.fail_query.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        let profiles = self.inner.profiles.lock().unwrap();
        Ok(profiles.iter().find(|user| user.id() == id).cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier<()> for MockProfileRepository {
    async fn upsert(&self, _con: &mut (), user: &User) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_upsert.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        self.inner.upserts.fetch_add(1, Ordering::SeqCst);
        let mut profiles = self.inner.profiles.lock().unwrap();
        match profiles.iter_mut().find(|stored| stored.id() == user.id()) {
            Some(stored) => *stored = user.clone(),
            None => profiles.push(user.clone()),
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockOrderRepository {
    inner: Arc<OrderInner>,
}

#[derive(Default)]
struct OrderInner {
    placed: AtomicUsize,
    fail_insert: AtomicBool,
}

impl MockOrderRepository {
    pub(crate) fn fail_insert(&self) {
        self.inner.fail_insert.store(true, Ordering::SeqCst);
    }

    pub(crate) fn placed(&self) -> usize {
        self.inner.placed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OrderModifier<()> for MockOrderRepository {
    async fn insert(&self, _con: &mut (), _order: &Order) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_insert.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        self.inner.placed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockForumRepository {
    inner: Arc<ForumInner>,
}

#[derive(Default)]
struct ForumInner {
    posts: Mutex<Vec<ForumPost>>,
    posts_inserted: AtomicUsize,
    fail_post: AtomicBool,
    fail_reply: AtomicBool,
    fail_likes: AtomicBool,
}

impl MockForumRepository {
    pub(crate) fn fail_post(&self) {
        self.inner.fail_post.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_reply(&self) {
        self.inner.fail_reply.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_likes(&self) {
        self.inner.fail_likes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn posts_inserted(&self) -> usize {
        self.inner.posts_inserted.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ForumQuery<()> for MockForumRepository {
    async fn find_all(&self, _con: &mut ()) -> error_stack::Result<Vec<ForumPost>, KernelError> {
        Ok(self.inner.posts.lock().unwrap().clone())
    }
}

#[async_trait::async_trait]
impl ForumModifier<()> for MockForumRepository {
    async fn insert_post(
        &self,
        _con: &mut (),
        post: &ForumPost,
    ) -> error_stack::Result<ForumPostId, KernelError> {
        if self.inner.fail_post.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        let issued = ForumPostId::new(Uuid::new_v4());
        self.inner
            .posts
            .lock()
            .unwrap()
            .insert(0, post.clone().with_id(issued.clone()));
        self.inner.posts_inserted.fetch_add(1, Ordering::SeqCst);
        Ok(issued)
    }

    async fn insert_reply(
        &self,
        _con: &mut (),
        reply: &ForumReply,
    ) -> error_stack::Result<ForumReplyId, KernelError> {
        if self.inner.fail_reply.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        let issued = ForumReplyId::new(Uuid::new_v4());
        let mut posts = self.inner.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|post| post.id() == reply.post_id()) {
            *post = post
                .clone()
                .with_reply(reply.clone().with_id(issued.clone()));
        }
        Ok(issued)
    }

    async fn update_post_likes(
        &self,
        _con: &mut (),
        _id: &ForumPostId,
        _liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_likes.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        Ok(())
    }

    async fn update_reply_likes(
        &self,
        _con: &mut (),
        _id: &ForumReplyId,
        _liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError> {
        if self.inner.fail_likes.load(Ordering::SeqCst) {
            return Err(unreachable_store());
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockInquiryRepository {
    inner: Arc<InquiryInner>,
}

#[derive(Default)]
struct InquiryInner {
    submitted: AtomicUsize,
}

impl MockInquiryRepository {
    pub(crate) fn submitted(&self) -> usize {
        self.inner.submitted.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InquiryModifier<()> for MockInquiryRepository {
    async fn insert(
        &self,
        _con: &mut (),
        _inquiry: &Inquiry,
    ) -> error_stack::Result<(), KernelError> {
        self.inner.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) struct MockAuthProvider {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    // one stable identity across repeated sign-ins
    user_id: UserId,
    session: Mutex<Option<AuthSession>>,
    fail: AtomicBool,
    require_confirmation: AtomicBool,
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self {
            inner: Arc::new(AuthInner {
                user_id: UserId::new(Uuid::new_v4()),
                session: Mutex::new(None),
                fail: AtomicBool::new(false),
                require_confirmation: AtomicBool::new(false),
            }),
        }
    }
}

impl MockAuthProvider {
    pub(crate) fn fail(&self) {
        self.inner.fail.store(true, Ordering::SeqCst);
    }

    pub(crate) fn require_confirmation(&self) {
        self.inner.require_confirmation.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl AuthProvider for MockAuthProvider {
    async fn current_session(&self) -> error_stack::Result<Option<AuthSession>, KernelError> {
        Ok(self.inner.session.lock().unwrap().clone())
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        name: &UserName,
    ) -> error_stack::Result<SignUpOutcome, KernelError> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Auth)
                .attach_printable("an account with this email already exists"));
        }
        if self.inner.require_confirmation.load(Ordering::SeqCst) {
            return Ok(SignUpOutcome::ConfirmationRequired);
        }
        let session = AuthSession::new(self.inner.user_id.clone(), email, Some(name.clone()));
        *self.inner.session.lock().unwrap() = Some(session.clone());
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_in(
        &self,
        email: &str,
        _password: &str,
    ) -> error_stack::Result<AuthSession, KernelError> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(
                Report::new(KernelError::Auth).attach_printable("invalid email or password")
            );
        }
        let session = AuthSession::new(self.inner.user_id.clone(), email, None);
        *self.inner.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> error_stack::Result<(), KernelError> {
        *self.inner.session.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockRecommender {
    inner: Arc<RecommenderInner>,
}

#[derive(Default)]
struct RecommenderInner {
    reply: Mutex<Option<String>>,
    last_prompt: Mutex<Option<String>>,
    fail: AtomicBool,
}

impl MockRecommender {
    pub(crate) fn reply(&self, text: &str) {
        *self.inner.reply.lock().unwrap() = Some(text.to_string());
    }

    pub(crate) fn fail(&self) {
        self.inner.fail.store(true, Ordering::SeqCst);
    }

    pub(crate) fn last_prompt(&self) -> Option<String> {
        self.inner.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Recommender for MockRecommender {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> error_stack::Result<String, KernelError> {
        *self.inner.last_prompt.lock().unwrap() = Some(request.prompt().clone());
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(
                Report::new(KernelError::Internal).attach_printable("generation unavailable")
            );
        }
        Ok(self.inner.reply.lock().unwrap().clone().unwrap_or_default())
    }
}
