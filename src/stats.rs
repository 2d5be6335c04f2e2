//! Blog collection statistics
//!
//! Pure aggregation functions over an in-memory slice of blogs. These take
//! data already fetched from the store and have no dependencies on it, so
//! they can be used for standalone reporting as well as by the service.
//!
//! All ties resolve to the first candidate in input order. Blogs without an
//! author are grouped under the empty string.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Blog;

/// An author together with how many blogs they have written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

/// An author together with the sum of likes across their blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: i64,
}

fn author_of(blog: &Blog) -> &str {
    blog.author.as_deref().unwrap_or("")
}

/// Sum of likes across all blogs. Zero for an empty slice.
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().map(|b| b.likes).sum()
}

/// The blog with the most likes, or `None` for an empty slice.
///
/// On ties the first maximal blog in input order wins.
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    let mut best: Option<&Blog> = None;
    for blog in blogs {
        if best.map_or(true, |b| blog.likes > b.likes) {
            best = Some(blog);
        }
    }
    best
}

/// The author with the most blogs and their count, or `None` for an empty
/// slice.
///
/// On ties the author whose first blog appears earliest in input order wins.
pub fn most_blogs(blogs: &[Blog]) -> Option<AuthorBlogs> {
    let tallies = tally_by_author(blogs, |_| 1);
    pick_leader(&tallies).map(|(author, blogs)| AuthorBlogs {
        author: author.to_string(),
        blogs: blogs as usize,
    })
}

/// The author with the highest summed likes and that total, or `None` for
/// an empty slice.
///
/// Same tie-break rule as [`most_blogs`].
pub fn most_likes(blogs: &[Blog]) -> Option<AuthorLikes> {
    let tallies = tally_by_author(blogs, |b| b.likes);
    pick_leader(&tallies).map(|(author, likes)| AuthorLikes {
        author: author.to_string(),
        likes,
    })
}

/// Accumulate a per-author total, preserving first-seen author order.
fn tally_by_author<'a>(blogs: &'a [Blog], weight: impl Fn(&Blog) -> i64) -> Vec<(&'a str, i64)> {
    let mut tallies: Vec<(&str, i64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for blog in blogs {
        let author = author_of(blog);
        match index.get(author) {
            Some(&i) => tallies[i].1 += weight(blog),
            None => {
                index.insert(author, tallies.len());
                tallies.push((author, weight(blog)));
            }
        }
    }

    tallies
}

/// First entry with the strictly greatest total.
fn pick_leader<'a>(tallies: &[(&'a str, i64)]) -> Option<(&'a str, i64)> {
    let mut best: Option<(&str, i64)> = None;
    for &(author, total) in tallies {
        if best.map_or(true, |(_, t)| total > t) {
            best = Some((author, total));
        }
    }
    best
}
