mod create_medication;
mod delete_medication;
mod get_medication;
mod get_medications_by_user;
mod update_medication;

use actix_web::web;
use create_medication::create_medication_controller;
use delete_medication::delete_medication_controller;
use get_medication::get_medication_controller;
use get_medications_by_user::get_medications_by_user_controller;
use update_medication::update_medication_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/medication",
        web::post().to(create_medication_controller),
    );
    cfg.route(
        "/user/{user_id}/medications",
        web::get().to(get_medications_by_user_controller),
    );
    cfg.route(
        "/medication/{medication_id}",
        web::get().to(get_medication_controller),
    );
    cfg.route(
        "/medication/{medication_id}",
        web::put().to(update_medication_controller),
    );
    cfg.route(
        "/medication/{medication_id}",
        web::delete().to(delete_medication_controller),
    );
}
