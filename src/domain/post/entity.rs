//! Post, comment and like entities

use serde::{Deserialize, Serialize};

/// A post written by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub post_id: i64,
    pub user_id: i64,
}

/// A like given by a user to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLike {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
}

/// A post together with its like count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithLikes {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
    pub likes: i64,
}

impl PostWithLikes {
    pub fn new(post: Post, likes: i64) -> Self {
        Self {
            id: post.id,
            body: post.body,
            user_id: post.user_id,
            likes,
        }
    }
}

/// A post with its like count and all of its comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithComments {
    pub post: PostWithLikes,
    pub comments: Vec<Comment>,
}

/// Ordering for post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSorting {
    /// Most recently created first
    #[default]
    New,
    /// Oldest first
    Old,
    /// Most liked first, newest first among equals
    MostLikes,
}

impl PostSorting {
    /// Sort posts in place according to this ordering
    pub fn apply(self, posts: &mut [PostWithLikes]) {
        match self {
            Self::New => posts.sort_by(|a, b| b.id.cmp(&a.id)),
            Self::Old => posts.sort_by(|a, b| a.id.cmp(&b.id)),
            Self::MostLikes => {
                posts.sort_by(|a, b| b.likes.cmp(&a.likes).then(b.id.cmp(&a.id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, likes: i64) -> PostWithLikes {
        PostWithLikes {
            id,
            body: format!("post {}", id),
            user_id: 1,
            likes,
        }
    }

    fn ids(posts: &[PostWithLikes]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_sorting_new() {
        let mut posts = vec![post(1, 0), post(3, 0), post(2, 0)];
        PostSorting::New.apply(&mut posts);
        assert_eq!(ids(&posts), vec![3, 2, 1]);
    }

    #[test]
    fn test_sorting_old() {
        let mut posts = vec![post(3, 0), post(1, 0), post(2, 0)];
        PostSorting::Old.apply(&mut posts);
        assert_eq!(ids(&posts), vec![1, 2, 3]);
    }

    #[test]
    fn test_sorting_most_likes_breaks_ties_by_newest() {
        let mut posts = vec![post(1, 2), post(2, 5), post(3, 2)];
        PostSorting::MostLikes.apply(&mut posts);
        assert_eq!(ids(&posts), vec![2, 3, 1]);
    }

    #[test]
    fn test_sorting_deserialize() {
        let sorting: PostSorting = serde_json::from_str(r#""most_likes""#).unwrap();
        assert_eq!(sorting, PostSorting::MostLikes);
        assert_eq!(PostSorting::default(), PostSorting::New);
    }
}
