use super::{CommandContext, CommandResult, Flow};
use reservas::components::reservation_calendar::interaction::detail_text;
use reservas::components::reservation_calendar::MonthView;
use reservas::utils::time::today_in;
use rust_i18n::t;

pub async fn next(ctx: &CommandContext) -> CommandResult {
    let month = ctx.current_month().await.next();
    ctx.show_month(month).await;
    Ok(Flow::Continue)
}

pub async fn previous(ctx: &CommandContext) -> CommandResult {
    let month = ctx.current_month().await.previous();
    ctx.show_month(month).await;
    Ok(Flow::Continue)
}

pub async fn today(ctx: &CommandContext) -> CommandResult {
    ctx.show_month(MonthView::containing(today_in(&ctx.timezone))).await;
    Ok(Flow::Continue)
}

/// Filter by space, or clear the filter
pub async fn space(ctx: &CommandContext, space_id: Option<String>) -> CommandResult {
    match &space_id {
        Some(space) => println!("{}", t!("console_space_set", space = space)),
        None => println!("{}", t!("console_space_all")),
    }
    ctx.controls.select_space(space_id);
    Ok(Flow::Continue)
}

/// Print the detail text of one shown entry
pub async fn show(ctx: &CommandContext, id: &str) -> CommandResult {
    let Some(calendar) = ctx.component_manager.calendar().await else {
        println!("{}", t!("console_component_disabled", name = "reservation_calendar"));
        return Ok(Flow::Continue);
    };

    match calendar.find_entry(id).await? {
        Some(entry) => println!("{}", detail_text(&entry)),
        None => println!("{}", t!("calendar_entry_not_found", id = id)),
    }
    Ok(Flow::Continue)
}
