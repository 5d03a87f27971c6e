#![deny(clippy::all, clippy::pedantic)]

use postdesk::domain::entities::CategoryDraft;

use crate::args::CategoriesCmd;
use crate::client::{CliError, Ctx};
use crate::handlers::finish;
use crate::io::confirm;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CategoriesCmd) -> Result<(), CliError> {
    ctx.restore_session().await?;
    match cmd {
        CategoriesCmd::List => {
            let categories = ctx.runtime.listing.load_categories().await?;
            print_json(&categories)
        }
        CategoriesCmd::Create { name, slug } => {
            let draft = CategoryDraft {
                name,
                slug: slug.unwrap_or_default(),
            };
            let category = ctx.runtime.editor.create_category(&draft).await?;
            print_json(&category)
        }
        CategoriesCmd::Update { id, name, slug } => {
            let draft = CategoryDraft {
                name,
                slug: slug.unwrap_or_default(),
            };
            let category = ctx.runtime.editor.update_category(&id, &draft).await?;
            print_json(&category)
        }
        CategoriesCmd::Delete { id, yes } => delete(ctx, &id, yes).await,
    }
}

async fn delete(ctx: &Ctx, id: &str, yes: bool) -> Result<(), CliError> {
    let categories = ctx.runtime.listing.load_categories().await?;
    let category = categories
        .into_iter()
        .find(|category| category.document_id == id || category.id.to_string() == id)
        .ok_or_else(|| CliError::CategoryNotFound(id.to_string()))?;

    let outcome = ctx
        .runtime
        .editor
        .delete_category(&category, |category| {
            yes || confirm(&format!("Delete category \"{}\"?", category.name))
        })
        .await;
    finish(outcome, "delete category")
}
