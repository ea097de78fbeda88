use crate::app_context::AppContext;

mod config_reload;
mod poll;
mod render;
mod sweep;

pub(crate) use render::render_frame;

pub fn start_background_jobs(app_context: AppContext) {
    poll::start_poll_job(app_context.clone());
    render::start_render_job(app_context.clone());
    sweep::start_sweep_job(app_context.clone());
    config_reload::start_config_hot_reload_job(app_context);
}
