use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A like entry. At most one per user on a given post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Like {
    pub user: Uuid,
}

/// A comment with the author's display fields denormalized at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LikeError {
    AlreadyLiked,
    NotYetLiked,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommentRemoveError {
    NotFound,
    NotOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    /// Author display fields, denormalized at creation time
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user: Uuid, text: String, name: String, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            text,
            name,
            avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Prepend a like for the user. Rejected, not deduplicated, when the
    /// user already appears in `likes`.
    pub fn like(&mut self, user: Uuid) -> Result<(), LikeError> {
        if self.likes.iter().any(|like| like.user == user) {
            return Err(LikeError::AlreadyLiked);
        }
        self.likes.insert(0, Like { user });
        Ok(())
    }

    /// Remove the user's like by its located position.
    pub fn unlike(&mut self, user: Uuid) -> Result<(), LikeError> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user == user)
            .ok_or(LikeError::NotYetLiked)?;
        self.likes.remove(index);
        Ok(())
    }

    /// Prepend a comment with the author's display fields.
    pub fn add_comment(
        &mut self,
        user: Uuid,
        text: String,
        name: String,
        avatar: Option<String>,
    ) -> &Comment {
        let comment =
            Comment { id: Uuid::new_v4(), user, text, name, avatar, created_at: Utc::now() };
        self.comments.insert(0, comment);
        &self.comments[0]
    }

    /// Remove a comment by id, only when the caller authored it.
    pub fn remove_comment(
        &mut self,
        comment_id: Uuid,
        caller: Uuid,
    ) -> Result<(), CommentRemoveError> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or(CommentRemoveError::NotFound)?;
        if self.comments[index].user != caller {
            return Err(CommentRemoveError::NotOwner);
        }
        self.comments.remove(index);
        Ok(())
    }
}
