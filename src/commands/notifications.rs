use super::{CommandContext, CommandResult, Flow};
use reservas::components::NotificationActorHandle;
use reservas::error::AppResult;
use reservas::toast::ToastKind;
use rust_i18n::t;
use tracing::error;

async fn center(ctx: &CommandContext) -> Option<NotificationActorHandle> {
    let handle = ctx.component_manager.notifications().await;
    if handle.is_none() {
        println!("{}", t!("console_component_disabled", name = "notifications"));
    }
    handle
}

async fn report(ctx: &CommandContext, result: AppResult<bool>) {
    match result {
        Ok(true) => ctx.toast(t!("notifications_marked"), ToastKind::Success).await,
        Ok(false) => ctx.toast(t!("notifications_mark_failed"), ToastKind::Error).await,
        Err(e) => {
            error!("Error marking notifications as read: {}", e);
            ctx.toast(t!("notifications_mark_failed"), ToastKind::Error).await
        }
    }
}

/// Reload and redraw the notification panel
pub async fn list(ctx: &CommandContext) -> CommandResult {
    if let Some(handle) = center(ctx).await {
        handle.refresh().await?;
    }
    Ok(Flow::Continue)
}

pub async fn read(ctx: &CommandContext, id: String) -> CommandResult {
    if let Some(handle) = center(ctx).await {
        report(ctx, handle.mark_read(id).await).await;
    }
    Ok(Flow::Continue)
}

pub async fn read_all(ctx: &CommandContext) -> CommandResult {
    if let Some(handle) = center(ctx).await {
        report(ctx, handle.mark_all_read().await).await;
    }
    Ok(Flow::Continue)
}
