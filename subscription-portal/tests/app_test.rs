//! End-to-end navigation through the [`App`] with the recording fake API.

mod common;

use std::time::Duration;

use common::{Call, FakeApi, Reply, ScriptedDialog, catalog, plan, subscription};
use rust_decimal::Decimal;
use subscription_portal::{
    App, PortalError,
    app::{Control, Page},
    command::Command,
    config::PaymentConfig,
    models::{
        BillingCycle, FailureReason, PaymentErrorDetails, PaymentOutcome, PaymentReceipt, PlanId,
        SubscribeResponse, SubscriptionId, SubscriptionStatus,
    },
    router::{Navigation, Route},
};
use tokio::time::Instant;

fn app(api: FakeApi) -> App<FakeApi, ScriptedDialog> {
    App::new(api, ScriptedDialog::accepting(), PaymentConfig::default())
}

fn fetches(app: &App<FakeApi, ScriptedDialog>) -> usize {
    app.api()
        .count(|call| matches!(call, Call::GetSubscription(_)))
}

fn receipt() -> PaymentOutcome {
    PaymentOutcome::Succeeded(PaymentReceipt {
        transaction_id: Some("TXN20240115103000ABCD".to_owned()),
        amount: Some(Decimal::new(4999, 2)),
        status: Some("completed".to_owned()),
        currency: Some("USD".to_owned()),
    })
}

#[tokio::test]
async fn test_open_mounts_page_and_renders_header() {
    let mut app = app(FakeApi::new().with_plans(Reply::Ok(catalog())));

    app.open(Route::Plans).await;

    assert_eq!(app.route(), Some(Route::Plans));
    assert!(matches!(app.page(), Page::Plans(_)));
    let rendered = app.to_string();
    assert!(rendered.starts_with("Subscription System\n"));
    assert!(rendered.contains("Choose Your Plan"));
}

#[tokio::test]
async fn test_unknown_path_mounts_not_found() {
    let mut app = app(FakeApi::new());

    app.open_path("/subscribe/abc").await;

    assert!(app.route().is_none());
    assert!(matches!(app.page(), Page::NotFound(path) if path == "/subscribe/abc"));
    assert!(app.to_string().contains("Page not found: /subscribe/abc"));
    assert!(app.api().calls().is_empty());
}

#[tokio::test]
async fn test_subscribe_flow_from_plans_to_payment() {
    let api = FakeApi::new()
        .with_plans(Reply::Ok(catalog()))
        .with_plan(Reply::Ok(plan(3, "Enterprise", 4999, BillingCycle::Monthly)))
        .with_subscribe(Reply::Ok(SubscribeResponse {
            subscription_id: SubscriptionId(41),
            message: None,
        }));
    let mut app = app(api);
    app.open(Route::Plans).await;

    assert!(app.execute(Command::Subscribe(PlanId(3))).await.unwrap());
    assert_eq!(app.route(), Some(Route::Subscribe(PlanId(3))));

    app.execute(Command::Name("Ada Lovelace".to_owned()))
        .await
        .unwrap();
    app.execute(Command::Email("ada@example.com".to_owned()))
        .await
        .unwrap();
    app.execute(Command::Submit).await.unwrap();

    assert_eq!(app.route(), Some(Route::Payment(SubscriptionId(41))));
    assert_eq!(
        app.api().count(|call| matches!(call, Call::Subscribe(_))),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_payment_success_redirects_after_configured_delay() {
    let api = FakeApi::new()
        .with_payment(Reply::Ok(receipt()))
        .with_subscription(Reply::Ok(subscription(41, SubscriptionStatus::Active, true)));
    let mut app = app(api);
    app.open(Route::Payment(SubscriptionId(41))).await;

    let control = app.dispatch(Command::Pay).await.unwrap();
    let Control::Navigate(navigation) = control else {
        panic!("expected a navigation, got {control:?}");
    };
    assert_eq!(
        navigation,
        Navigation::after(
            Route::Status(SubscriptionId(41)),
            Duration::from_millis(2500),
        )
    );
    assert!(app.to_string().contains("Payment Successful!"));
    assert_eq!(fetches(&app), 0);

    let started = Instant::now();
    app.follow(navigation).await;

    assert!(started.elapsed() >= Duration::from_millis(2500));
    assert_eq!(app.route(), Some(Route::Status(SubscriptionId(41))));
    assert!(app.to_string().contains("Subscription Details"));
}

#[tokio::test(start_paused = true)]
async fn test_payment_failure_stays_on_page() {
    let api = FakeApi::new().with_payment(Reply::Ok(PaymentOutcome::Declined {
        message: Some("Your card has expired. Please use a different payment method.".to_owned()),
        details: PaymentErrorDetails {
            code: Some("card_declined".to_owned()),
            reason: Some("expired_card".to_owned()),
            transaction_id: Some("TXN1".to_owned()),
        },
    }));
    let mut app = app(api);
    app.open(Route::Payment(SubscriptionId(41))).await;

    let control = app
        .dispatch(Command::Fail(FailureReason::ExpiredCard))
        .await
        .unwrap();

    assert_eq!(control, Control::Continue);
    assert_eq!(app.route(), Some(Route::Payment(SubscriptionId(41))));
    assert!(app.to_string().contains("Error Code: card_declined"));
}

#[tokio::test]
async fn test_command_not_offered_on_page_sends_nothing() {
    let mut app = app(FakeApi::new().with_plans(Reply::Ok(catalog())));
    app.open(Route::Plans).await;

    for command in [
        Command::Pay,
        Command::Renew,
        Command::Submit,
        Command::View(SubscriptionId(1)),
    ] {
        let result = app.dispatch(command).await;
        assert!(matches!(result, Err(PortalError::InvalidInput(_))));
    }
    assert_eq!(app.api().calls(), vec![Call::ListPlans]);
}

#[tokio::test]
async fn test_cancel_through_app_confirms_and_refetches() {
    let api = FakeApi::new()
        .with_subscription(Reply::Ok(subscription(12, SubscriptionStatus::Active, true)))
        .with_subscription(Reply::Ok(subscription(12, SubscriptionStatus::Cancelled, false)))
        .with_cancel(Reply::Ok(common::action("Subscription cancelled")));
    let mut app = app(api);
    app.open(Route::Status(SubscriptionId(12))).await;

    assert_eq!(
        app.dispatch(Command::Cancel).await.unwrap(),
        Control::Continue
    );

    assert_eq!(app.api().count(|call| matches!(call, Call::Cancel(_))), 1);
    assert_eq!(fetches(&app), 2);
    assert!(app.to_string().contains("[CANCELLED]"));
}

#[tokio::test]
async fn test_back_and_home_navigate_to_plans() {
    let api = FakeApi::new()
        .with_subscription(Reply::Ok(subscription(12, SubscriptionStatus::Active, true)))
        .with_plans(Reply::Ok(catalog()));
    let mut app = app(api);
    app.open(Route::Status(SubscriptionId(12))).await;

    assert_eq!(
        app.dispatch(Command::Back).await.unwrap(),
        Control::Navigate(Navigation::to(Route::Plans))
    );
    assert_eq!(
        app.dispatch(Command::Home).await.unwrap(),
        Control::Navigate(Navigation::to(Route::Plans))
    );
}

#[tokio::test]
async fn test_reload_remounts_current_route() {
    let mut app = app(FakeApi::new().with_plans(Reply::Ok(catalog())));
    app.open(Route::Plans).await;

    app.execute(Command::Reload).await.unwrap();

    assert_eq!(app.api().calls(), vec![Call::ListPlans, Call::ListPlans]);
}

#[tokio::test]
async fn test_search_command_sets_email_and_looks_up() {
    let api = FakeApi::new().with_user(Reply::error(404, "User not found"));
    let mut app = app(api);
    app.open_path("/my-subscriptions").await;

    app.execute(Command::Search(Some("nobody@example.com".to_owned())))
        .await
        .unwrap();

    assert_eq!(
        app.api().calls(),
        vec![Call::FindUser("nobody@example.com".to_owned())]
    );
    let rendered = app.to_string();
    assert!(rendered.contains("User not found or no subscriptions"));
}

#[tokio::test]
async fn test_help_and_quit() {
    let mut app = app(FakeApi::new());

    let Control::Message(help) = app.dispatch(Command::Help).await.unwrap() else {
        panic!("expected help text");
    };
    assert!(help.contains("fail <reason>"));
    assert!(!app.execute(Command::Quit).await.unwrap());
}
