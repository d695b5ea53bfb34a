//! Profile commands.

use mesto_config::validate_link;
use mesto_core::AppState;

use crate::cli::{AvatarArgs, OutputFormat, ProfileSetArgs};
use crate::client::{CliError, CliResult, require_session, require_success};
use crate::output::render_profile;

pub(crate) fn handle_profile_show(app: &AppState, output: OutputFormat) -> CliResult<String> {
    require_session(app)?;
    render_profile(app.profile(), output)
}

pub(crate) async fn handle_profile_set(
    app: &mut AppState,
    args: ProfileSetArgs,
    output: OutputFormat,
) -> CliResult<String> {
    require_session(app)?;
    let name = args.name.trim();
    let about = args.about.trim();
    if name.is_empty() || about.is_empty() {
        return Err(CliError::validation("name and about cannot be empty"));
    }
    require_success(app.update_profile(name, about).await, "profile update")?;
    render_profile(app.profile(), output)
}

pub(crate) async fn handle_profile_avatar(
    app: &mut AppState,
    args: AvatarArgs,
    output: OutputFormat,
) -> CliResult<String> {
    require_session(app)?;
    let link = args.link.trim();
    validate_link(link)?;
    require_success(app.update_avatar(link).await, "avatar update")?;
    render_profile(app.profile(), output)
}
