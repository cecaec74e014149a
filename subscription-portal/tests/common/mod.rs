//! Shared test doubles: a recording in-memory API and a scripted dialog.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{collections::VecDeque, sync::Mutex};

use rust_decimal::Decimal;
use subscription_portal::{
    api::SubscriptionApi,
    error::{ApiErrorBody, PortalError, Result},
    models::{
        ActionResponse, ApiHealth, ApiTimestamp, BillingCycle, Payment, PaymentId, PaymentOutcome,
        PaymentSimulationRequest, PaymentStatus, Plan, PlanId, SubscribeRequest,
        SubscribeResponse, Subscription, SubscriptionId, SubscriptionStatus, SubscriptionSummary,
        User, UserId,
    },
    pages::Dialog,
};

/// A request the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPlans,
    GetPlan(PlanId),
    Subscribe(SubscribeRequest),
    SimulatePayment(PaymentSimulationRequest),
    GetSubscription(SubscriptionId),
    Renew(SubscriptionId),
    Cancel(SubscriptionId),
    FindUser(String),
    ListUserSubscriptions(UserId),
    Health,
}

/// A canned answer.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Err {
        status: u16,
        body: Option<ApiErrorBody>,
    },
}

impl<T> Reply<T> {
    /// `{"error": message}` with the given status.
    pub fn error(status: u16, message: &str) -> Self {
        Self::Err {
            status,
            body: Some(ApiErrorBody {
                error: Some(message.to_owned()),
                ..ApiErrorBody::default()
            }),
        }
    }

    /// Non-JSON failure with the given status.
    pub const fn bare(status: u16) -> Self {
        Self::Err { status, body: None }
    }
}

/// Replies are consumed front to back; the last one repeats.
#[derive(Debug)]
struct Script<T>(Mutex<VecDeque<Reply<T>>>);

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T: Clone> Script<T> {
    fn push(&self, reply: Reply<T>) {
        self.0.lock().unwrap().push_back(reply);
    }

    fn next(&self, endpoint: &str) -> Result<T> {
        let mut queue = self.0.lock().unwrap();
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        match reply {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Err { status, body }) => Err(PortalError::ApiError { status, body }),
            None => panic!("no reply scripted for {endpoint}"),
        }
    }
}

/// In-memory [`SubscriptionApi`] that records every call.
#[derive(Debug, Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    plans: Script<Vec<Plan>>,
    plan: Script<Plan>,
    subscribe: Script<SubscribeResponse>,
    payment: Script<PaymentOutcome>,
    subscription: Script<Subscription>,
    renew: Script<ActionResponse>,
    cancel: Script<ActionResponse>,
    user: Script<User>,
    user_subscriptions: Script<Vec<SubscriptionSummary>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn with_plans(self, reply: Reply<Vec<Plan>>) -> Self {
        self.plans.push(reply);
        self
    }

    pub fn with_plan(self, reply: Reply<Plan>) -> Self {
        self.plan.push(reply);
        self
    }

    pub fn with_subscribe(self, reply: Reply<SubscribeResponse>) -> Self {
        self.subscribe.push(reply);
        self
    }

    pub fn with_payment(self, reply: Reply<PaymentOutcome>) -> Self {
        self.payment.push(reply);
        self
    }

    pub fn with_subscription(self, reply: Reply<Subscription>) -> Self {
        self.subscription.push(reply);
        self
    }

    pub fn with_renew(self, reply: Reply<ActionResponse>) -> Self {
        self.renew.push(reply);
        self
    }

    pub fn with_cancel(self, reply: Reply<ActionResponse>) -> Self {
        self.cancel.push(reply);
        self
    }

    pub fn with_user(self, reply: Reply<User>) -> Self {
        self.user.push(reply);
        self
    }

    pub fn with_user_subscriptions(self, reply: Reply<Vec<SubscriptionSummary>>) -> Self {
        self.user_subscriptions.push(reply);
        self
    }
}

impl SubscriptionApi for FakeApi {
    async fn list_plans(&self) -> Result<Vec<Plan>> {
        self.record(Call::ListPlans);
        self.plans.next("GET /plans")
    }

    async fn get_plan(&self, id: PlanId) -> Result<Plan> {
        self.record(Call::GetPlan(id));
        self.plan.next("GET /plans/{id}")
    }

    async fn subscribe(&self, request: &SubscribeRequest) -> Result<SubscribeResponse> {
        self.record(Call::Subscribe(request.clone()));
        self.subscribe.next("POST /subscribe")
    }

    async fn simulate_payment(&self, request: &PaymentSimulationRequest) -> Result<PaymentOutcome> {
        self.record(Call::SimulatePayment(request.clone()));
        self.payment.next("POST /payment/simulate")
    }

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Subscription> {
        self.record(Call::GetSubscription(id));
        self.subscription.next("GET /subscriptions/status/{id}")
    }

    async fn renew_subscription(&self, id: SubscriptionId) -> Result<ActionResponse> {
        self.record(Call::Renew(id));
        self.renew.next("POST /subscriptions/{id}/renew")
    }

    async fn cancel_subscription(&self, id: SubscriptionId) -> Result<ActionResponse> {
        self.record(Call::Cancel(id));
        self.cancel.next("POST /subscriptions/{id}/cancel")
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User> {
        self.record(Call::FindUser(email.to_owned()));
        self.user.next("GET /users/{email}")
    }

    async fn list_user_subscriptions(&self, user_id: UserId) -> Result<Vec<SubscriptionSummary>> {
        self.record(Call::ListUserSubscriptions(user_id));
        self.user_subscriptions.next("GET /subscriptions/{user_id}")
    }

    async fn health(&self) -> Result<ApiHealth> {
        self.record(Call::Health);
        Ok(ApiHealth {
            status: "healthy".to_owned(),
            message: None,
        })
    }
}

/// Dialog that answers every confirmation the same way and records prompts.
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    answer: bool,
    confirms: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedDialog {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            ..Self::default()
        }
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Dialog for ScriptedDialog {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_owned());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_owned());
    }
}

pub fn plan(id: u64, name: &str, cents: i64, cycle: BillingCycle) -> Plan {
    Plan {
        id: PlanId(id),
        name: name.to_owned(),
        price: Decimal::new(cents, 2),
        billing_cycle: cycle,
        features: vec![format!("{name} feature one"), format!("{name} feature two")],
    }
}

pub fn catalog() -> Vec<Plan> {
    vec![
        plan(1, "Basic", 999, BillingCycle::Monthly),
        plan(4, "Basic Annual", 9999, BillingCycle::Yearly),
        plan(2, "Pro", 1999, BillingCycle::Monthly),
        plan(5, "Pro Annual", 19999, BillingCycle::Yearly),
        plan(3, "Enterprise", 4999, BillingCycle::Monthly),
    ]
}

pub fn subscription(id: u64, status: SubscriptionStatus, auto_renew: bool) -> Subscription {
    Subscription {
        id: SubscriptionId(id),
        plan: plan(2, "Pro", 1999, BillingCycle::Monthly),
        user: User {
            id: UserId(7),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            created_at: None,
        },
        status,
        start_date: ApiTimestamp::from("2024-01-15 10:30:00.123456"),
        end_date: ApiTimestamp::from("2024-02-14 10:30:00.123456"),
        next_billing_date: Some(ApiTimestamp::from("2024-02-14 10:30:00.123456")),
        auto_renew,
        payments: vec![Payment {
            id: PaymentId(9),
            amount: Decimal::new(1999, 2),
            transaction_id: Some("TXN20240115103000ABCD".to_owned()),
            status: PaymentStatus::Completed,
            payment_date: ApiTimestamp::from("2024-01-15 10:30:02"),
        }],
    }
}

pub fn summary(id: u64, status: SubscriptionStatus) -> SubscriptionSummary {
    SubscriptionSummary {
        id: SubscriptionId(id),
        plan_name: "Pro".to_owned(),
        price: Decimal::new(1999, 2),
        billing_cycle: BillingCycle::Monthly,
        status,
        next_billing_date: None,
        features: vec![],
        start_date: None,
        end_date: None,
        auto_renew: true,
        last_payment: None,
    }
}

pub fn action(message: &str) -> ActionResponse {
    ActionResponse {
        message: message.to_owned(),
        success: Some(true),
        transaction_id: None,
        new_end_date: None,
    }
}
