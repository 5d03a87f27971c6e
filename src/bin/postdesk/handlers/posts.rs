#![deny(clippy::all, clippy::pedantic)]

use postdesk::application::repos::PostQuery;
use postdesk::domain::entities::PostDraft;
use serde_json::json;

use crate::args::{PageArgs, PostFields, PostsCmd};
use crate::client::{CliError, Ctx};
use crate::handlers::finish;
use crate::io::{confirm, read_opt_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List(args) => list(ctx, args).await,
        PostsCmd::Get { slug } => print_json(&ctx.post_by_slug(&slug).await?),
        PostsCmd::Create(fields) => create(ctx, fields).await,
        PostsCmd::Update { slug, fields } => update(ctx, &slug, fields).await,
        PostsCmd::Delete { slug, yes } => delete(ctx, &slug, yes).await,
        PostsCmd::Toggle { slug } => toggle(ctx, &slug).await,
    }
}

/// Published posts through the public API; no session needed.
pub async fn published(ctx: &Ctx, args: PageArgs) -> Result<(), CliError> {
    let query = PostQuery::new(
        args.page,
        ctx.runtime.settings.listing.page_size.get(),
        &args.search,
    );
    let page = ctx.runtime.cms.list_published_posts(&query).await?;
    print_json(&json!({
        "items": page.items,
        "pagination": page.pagination,
    }))
}

async fn list(ctx: &Ctx, args: PageArgs) -> Result<(), CliError> {
    ctx.restore_session().await?;
    let snapshot = ctx.runtime.listing.load(args.page, &args.search).await?;
    print_json(&snapshot)
}

async fn create(ctx: &Ctx, fields: PostFields) -> Result<(), CliError> {
    let content = read_opt_value(fields.content, fields.content_file)?;
    let draft = PostDraft {
        title: fields.title.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        content: content.unwrap_or_default(),
        slug: fields.slug.unwrap_or_default(),
        category_id: fields.category,
    };
    ctx.restore_session().await?;
    let post = ctx.runtime.editor.create_post(&draft).await?;
    print_json(&post)
}

async fn update(ctx: &Ctx, slug: &str, fields: PostFields) -> Result<(), CliError> {
    let content = read_opt_value(fields.content, fields.content_file)?;
    let post = ctx.post_by_slug(slug).await?;
    let mut draft = PostDraft::from(&post);
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(content) = content {
        draft.content = content;
    }
    if let Some(new_slug) = fields.slug {
        draft.slug = new_slug;
    }
    if fields.category.is_some() {
        draft.category_id = fields.category;
    }

    let updated = ctx
        .runtime
        .editor
        .update_post(&post.document_id, &draft)
        .await?;
    print_json(&updated)
}

async fn delete(ctx: &Ctx, slug: &str, yes: bool) -> Result<(), CliError> {
    let post = ctx.post_by_slug(slug).await?;
    let outcome = ctx
        .runtime
        .editor
        .delete_post(&post, |post| {
            yes || confirm(&format!("Delete post \"{}\"?", post.title))
        })
        .await;
    finish(outcome, "delete post")
}

async fn toggle(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let post = ctx.post_by_slug(slug).await?;
    let outcome = ctx.runtime.editor.toggle_publish(&post).await;
    let action = if post.is_published() {
        "unpublish post"
    } else {
        "publish post"
    };
    finish(outcome, action)
}
