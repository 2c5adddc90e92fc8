//! Domain → response conversions for the blog API.

use inkpress_core::domain::{Comment, Post, Tag};
use inkpress_core::pagination::Page;
use inkpress_core::recommendation::SimilarPost;
use inkpress_core::services::{PostDetail, PostListing};
use inkpress_shared::dto::{
    CommentResponse, PageResponse, PostDetailResponse, PostListResponse, PostResponse,
    SimilarPostResponse, TagResponse,
};

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        id: tag.id.to_string(),
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        slug: post.slug.clone(),
        body: post.body.clone(),
        author_id: post.author_id.to_string(),
        publish: post.publish.to_rfc3339(),
        sticked_post: post.sticked_post,
        tags: post.tags.iter().map(tag).collect(),
        url: post.absolute_url(),
    }
}

pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        name: comment.name.clone(),
        body: comment.body.clone(),
        created: comment.created_at.to_rfc3339(),
    }
}

fn similar(similar: &SimilarPost) -> SimilarPostResponse {
    SimilarPostResponse {
        post: post(&similar.post),
        same_tags: similar.same_tags,
    }
}

fn page<T, U>(page: Page<T>, f: impl Fn(&T) -> U) -> PageResponse<U> {
    let has_previous = page.has_previous();
    let has_next = page.has_next();
    PageResponse {
        items: page.items.iter().map(f).collect(),
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        has_previous,
        has_next,
    }
}

pub fn listing(listing: PostListing) -> PostListResponse {
    PostListResponse {
        tag: listing.tag.as_ref().map(tag),
        posts: page(listing.posts, post),
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(&detail.post),
        comments: detail.comments.iter().map(comment).collect(),
        similar_posts: detail.similar_posts.iter().map(similar).collect(),
    }
}
