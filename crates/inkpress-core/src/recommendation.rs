//! "Similar posts" ranking by shared tags.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Post;

/// Number of recommendations shown under a post.
pub const SIMILAR_POSTS_LIMIT: usize = 4;

/// A recommended post and how many tags it shares with the reference post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarPost {
    pub post: Post,
    pub same_tags: u32,
}

/// Rank `candidates` by tag overlap with `reference`.
///
/// Candidates must already be restricted to published posts. The reference
/// post itself and candidates sharing no tag are skipped. Every tag row of a
/// candidate whose id is among the reference's tags counts once towards
/// `same_tags`. Results are ordered by `same_tags` desc, then `publish` desc,
/// then id, and cut to `limit`.
pub fn rank_similar<'a, I>(reference: &Post, candidates: I, limit: usize) -> Vec<SimilarPost>
where
    I: IntoIterator<Item = &'a Post>,
{
    let reference_tags: HashSet<Uuid> = reference.tags.iter().map(|t| t.id).collect();
    if reference_tags.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<SimilarPost> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != reference.id)
        .filter_map(|candidate| {
            let same_tags = candidate
                .tags
                .iter()
                .filter(|t| reference_tags.contains(&t.id))
                .count() as u32;
            (same_tags > 0).then(|| SimilarPost {
                post: candidate.clone(),
                same_tags,
            })
        })
        .collect();

    ranked.sort_by(compare_similar);
    ranked.truncate(limit);
    ranked
}

/// Order used for recommendations: most shared tags, then most recent.
pub fn compare_similar(a: &SimilarPost, b: &SimilarPost) -> Ordering {
    b.same_tags
        .cmp(&a.same_tags)
        .then_with(|| b.post.publish.cmp(&a.post.publish))
        .then_with(|| a.post.id.cmp(&b.post.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;
    use chrono::{Duration, TimeZone, Utc};

    fn post(title: &str, tags: &[&Tag], day: i64) -> Post {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Post::new(Uuid::new_v4(), title, "body")
            .with_publish(base + Duration::days(day))
            .with_tags(tags.iter().map(|t| (*t).clone()).collect())
            .publish()
    }

    #[test]
    fn test_ranks_by_shared_tags_then_recency() {
        let (x, y, z) = (Tag::new("x"), Tag::new("y"), Tag::new("z"));
        let a = post("A", &[&x, &y], 0);
        let b = post("B", &[&x], 1);
        let c = post("C", &[&x, &y, &z], 2);
        let d = post("D", &[&z], 3);
        let all = [a.clone(), b.clone(), c.clone(), d];

        let similar = rank_similar(&a, &all, SIMILAR_POSTS_LIMIT);

        let titles: Vec<_> = similar.iter().map(|s| s.post.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B"]);
        assert_eq!(similar[0].same_tags, 2);
        assert_eq!(similar[1].same_tags, 1);
    }

    #[test]
    fn test_untagged_reference_has_no_recommendations() {
        let x = Tag::new("x");
        let lonely = post("Lonely", &[], 0);
        let other = post("Other", &[&x], 1);

        assert!(rank_similar(&lonely, [&other], SIMILAR_POSTS_LIMIT).is_empty());
    }

    #[test]
    fn test_limit_and_ordering_hold() {
        let x = Tag::new("x");
        let y = Tag::new("y");
        let reference = post("Ref", &[&x, &y], 0);
        let mut all = vec![reference.clone()];
        for day in 1..=7 {
            let tags: Vec<&Tag> = if day % 2 == 0 { vec![&x, &y] } else { vec![&x] };
            all.push(post(&format!("P{day}"), &tags, day));
        }

        let similar = rank_similar(&reference, &all, SIMILAR_POSTS_LIMIT);

        assert_eq!(similar.len(), SIMILAR_POSTS_LIMIT);
        assert!(similar.iter().all(|s| s.post.id != reference.id));
        for pair in similar.windows(2) {
            assert!(pair[0].same_tags >= pair[1].same_tags);
            if pair[0].same_tags == pair[1].same_tags {
                assert!(pair[0].post.publish >= pair[1].post.publish);
            }
        }
        let titles: Vec<_> = similar.iter().map(|s| s.post.title.as_str()).collect();
        assert_eq!(titles, vec!["P6", "P4", "P2", "P7"]);
    }

    #[test]
    fn test_counts_every_matching_tag_row() {
        let x = Tag::new("x");
        let reference = post("Ref", &[&x], 0);
        let doubled = post("Doubled", &[&x, &x], 1);

        let similar = rank_similar(&reference, [&doubled], SIMILAR_POSTS_LIMIT);
        assert_eq!(similar[0].same_tags, 2);
    }
}
