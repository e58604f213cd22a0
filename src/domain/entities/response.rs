//! Plugin responses: the desired bot output for one event.

/// A new message to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub text: String,
}

impl PostContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Replacement content for a message the bot already sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditContent {
    pub text: String,
}

impl EditContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<EditContent> for PostContent {
    fn from(edit: EditContent) -> Self {
        PostContent { text: edit.text }
    }
}

/// What a plugin wants the channel to look like after an event.
///
/// `edits` is `None` when the plugin says nothing about earlier output, and
/// `Some(list)` when `list` is the full desired state of it (an empty list
/// removes all of it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub posts: Vec<PostContent>,
    pub edits: Option<Vec<EditContent>>,
    pub keep_on_delete: bool,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response made of a single new post
    pub fn post(text: impl Into<String>) -> Self {
        Self::new().with_post(text)
    }

    /// Response rewriting previous output into `texts`
    pub fn edits<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            edits: Some(texts.into_iter().map(EditContent::new).collect()),
            ..Self::default()
        }
    }

    pub fn with_post(mut self, text: impl Into<String>) -> Self {
        self.posts.push(PostContent::new(text));
        self
    }

    pub fn with_edit(mut self, text: impl Into<String>) -> Self {
        self.edits
            .get_or_insert_with(Vec::new)
            .push(EditContent::new(text));
        self
    }

    /// Keep earlier output when the triggering message is deleted
    pub fn keep_on_delete(mut self) -> Self {
        self.keep_on_delete = true;
        self
    }
}
