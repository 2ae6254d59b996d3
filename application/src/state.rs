use kernel::prelude::entity::{
    Book, BookId, CartItem, CartItemId, ForumPost, ForumPostId, ForumReply, ForumReplyId, User,
};

/// Undo command captured at the moment of an optimistic mutation. Applying
/// it restores exactly the state that mutation replaced, regardless of what
/// else changed in between.
pub struct Rollback(Box<dyn FnOnce(&mut StoreState) + Send>);

impl Rollback {
    fn new(undo: impl FnOnce(&mut StoreState) + Send + 'static) -> Self {
        Self(Box::new(undo))
    }

    pub fn apply(self, state: &mut StoreState) {
        (self.0)(state)
    }
}

/// In-memory storefront state. Services mutate it optimistically and hold
/// the returned [`Rollback`] until the remote write settles.
#[derive(Default)]
pub struct StoreState {
    user: Option<User>,
    books: Vec<Book>,
    selected_book: Option<Book>,
    cart: Vec<CartItem>,
    posts: Vec<ForumPost>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.selected_book.as_ref()
    }

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn cart_item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.id() == id)
    }

    pub fn posts(&self) -> &[ForumPost] {
        &self.posts
    }

    pub fn post(&self, id: &ForumPostId) -> Option<&ForumPost> {
        self.posts.iter().find(|post| post.id() == id)
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Sign-out wipes everything tied to the identity; the catalogue and
    /// forum stay.
    pub fn clear_session(&mut self) {
        self.user = None;
        self.cart.clear();
    }

    pub fn replace_books(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    pub fn select_book(&mut self, book: Option<Book>) {
        self.selected_book = book;
    }

    /// New listings go to the front, matching catalogue order.
    pub fn push_book(&mut self, book: Book) -> Rollback {
        let id = book.id().clone();
        self.books.insert(0, book);
        Rollback::new(move |state| state.books.retain(|book| book.id() != &id))
    }

    /// Syncs the catalogue entry and, when it is the same book, the open
    /// detail view.
    pub fn update_book(&mut self, book: Book) {
        if let Some(slot) = self.books.iter_mut().find(|slot| slot.id() == book.id()) {
            *slot = book.clone();
        }
        if self
            .selected_book
            .as_ref()
            .is_some_and(|selected| selected.id() == book.id())
        {
            self.selected_book = Some(book);
        }
    }

    pub fn replace_cart(&mut self, cart: Vec<CartItem>) {
        self.cart = cart;
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn push_cart_item(&mut self, item: CartItem) -> Rollback {
        let id = item.id().clone();
        self.cart.push(item);
        Rollback::new(move |state| state.cart.retain(|item| item.id() != &id))
    }

    /// Swaps a provisional line identity for the one issued by the store.
    pub fn adopt_cart_item_id(&mut self, provisional: &CartItemId, issued: CartItemId) {
        if let Some(slot) = self.cart.iter_mut().find(|item| item.id() == provisional) {
            *slot = slot.clone().with_id(issued);
        }
    }

    pub fn remove_cart_item(&mut self, id: &CartItemId) -> Option<CartItem> {
        let index = self.cart.iter().position(|item| item.id() == id)?;
        Some(self.cart.remove(index))
    }

    /// Replaces the line in place; the undo restores the previous line.
    pub fn replace_cart_item(&mut self, item: CartItem) -> Option<Rollback> {
        let slot = self.cart.iter_mut().find(|slot| slot.id() == item.id())?;
        let previous = std::mem::replace(slot, item);
        Some(Rollback::new(move |state| {
            if let Some(slot) = state
                .cart
                .iter_mut()
                .find(|slot| slot.id() == previous.id())
            {
                *slot = previous;
            }
        }))
    }

    pub fn replace_posts(&mut self, posts: Vec<ForumPost>) {
        self.posts = posts;
    }

    pub fn push_post(&mut self, post: ForumPost) -> Rollback {
        let id = post.id().clone();
        self.posts.insert(0, post);
        Rollback::new(move |state| state.posts.retain(|post| post.id() != &id))
    }

    pub fn adopt_post_id(&mut self, provisional: &ForumPostId, issued: ForumPostId) {
        if let Some(slot) = self.posts.iter_mut().find(|post| post.id() == provisional) {
            *slot = slot.clone().with_id(issued);
        }
    }

    pub fn update_post(&mut self, post: ForumPost) {
        if let Some(slot) = self.posts.iter_mut().find(|slot| slot.id() == post.id()) {
            *slot = post;
        }
    }

    pub fn add_reply(&mut self, post_id: &ForumPostId, reply: ForumReply) -> Option<Rollback> {
        let slot = self.posts.iter_mut().find(|post| post.id() == post_id)?;
        let previous = slot.clone();
        *slot = previous.clone().with_reply(reply);
        Some(Rollback::new(move |state| {
            if let Some(slot) = state
                .posts
                .iter_mut()
                .find(|post| post.id() == previous.id())
            {
                *slot = previous;
            }
        }))
    }

    pub fn adopt_reply_id(
        &mut self,
        post_id: &ForumPostId,
        provisional: &ForumReplyId,
        issued: ForumReplyId,
    ) {
        if let Some(slot) = self.posts.iter_mut().find(|post| post.id() == post_id) {
            *slot = slot.clone().adopt_reply_id(provisional, issued);
        }
    }
}

pub trait DependOnStoreState: 'static + Sync + Send {
    fn store_state(&self) -> &StoreState;
    fn store_state_mut(&mut self) -> &mut StoreState;
}
