use crate::{
    api::{attendance, employee, leave_request, reference},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

/// Milliseconds between permit refills; never zero.
fn refill_interval_ms(requests_per_min: u32) -> u64 {
    (60_000 / u64::from(requests_per_min.max(1))).max(1)
}

/// Token-bucket limiter keyed by peer IP, refilling `requests_per_min`
/// permits per minute.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);

    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(refill_interval_ms(requests_per_min))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    .service(web::resource("/check-in").route(web::post().to(attendance::check_in)))
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(web::resource("/calendar").route(web::get().to(attendance::calendar)))
                    .service(
                        web::resource("/presence").route(web::get().to(attendance::team_presence)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // fixed segments must be registered before /leave/{id}
                    .service(web::resource("/mine").route(web::get().to(leave_request::my_leaves)))
                    .service(
                        web::resource("/balance").route(web::get().to(leave_request::leave_balance)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::resource("/leave-types")
                    .route(web::get().to(reference::list_leave_types))
                    .route(web::post().to(reference::create_leave_type)),
            )
            .service(
                web::resource("/holidays")
                    .route(web::get().to(reference::list_holidays))
                    .route(web::post().to(reference::create_holiday)),
            )
            .service(
                web::scope("/employee")
                    // /employee
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    // /employee/{id}
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee))),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refill_interval_spreads_a_minute_over_the_budget() {
        assert_eq!(refill_interval_ms(60), 1_000);
        assert_eq!(refill_interval_ms(120), 500);
        assert_eq!(refill_interval_ms(0), 60_000);
        assert_eq!(refill_interval_ms(u32::MAX), 1);
    }
}
