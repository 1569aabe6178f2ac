#![forbid(unsafe_code)]
use rota::model::{RequestedRole, Role, TaskKind};
use rota::scheduler::rules::{next_role, DayContext, Decision, GridEffect, Refusal, Request};

fn task(kind: TaskKind, mode: RequestedRole) -> Request {
    Request::Task { kind, mode }
}

fn apply(role: Role, grid: GridEffect) -> Decision {
    Decision::Apply { role, grid }
}

const FREE_DAY: DayContext = DayContext {
    is_task_day: false,
    at_allocation_cap: false,
    rest_due: false,
};

const TASK_DAY: DayContext = DayContext {
    is_task_day: true,
    at_allocation_cap: false,
    rest_due: false,
};

const AT_CAP: DayContext = DayContext {
    is_task_day: false,
    at_allocation_cap: true,
    rest_due: false,
};

#[test]
fn unavailable_days_refuse_every_request() {
    let requests = [
        Request::Forced,
        Request::Remaining,
        task(TaskKind::Milestone, RequestedRole::Analyst),
        task(TaskKind::PrimaryActivity, RequestedRole::Console),
    ];
    for request in requests {
        for role in [Role::Blackout, Role::Greyout] {
            assert_eq!(
                next_role(role, request, TASK_DAY),
                Decision::Refuse(Refusal::Unavailable(role)),
                "{role} / {request:?}"
            );
        }
    }
}

#[test]
fn forced_seats_only_duty_days() {
    assert_eq!(
        next_role(Role::OnDuty, Request::Forced, FREE_DAY),
        apply(Role::OnDuty, GridEffect::Occupy)
    );
    let kept = next_role(Role::Analyst, Request::Forced, FREE_DAY);
    assert!(kept.is_noop(Role::Analyst));
}

#[test]
fn remaining_fills_free_days_only() {
    assert_eq!(
        next_role(Role::Free, Request::Remaining, FREE_DAY),
        apply(Role::OnDuty, GridEffect::Occupy)
    );
    assert_eq!(
        next_role(Role::Free, Request::Remaining, AT_CAP),
        Decision::Refuse(Refusal::AllocationCap)
    );
    let rest = DayContext {
        rest_due: true,
        ..FREE_DAY
    };
    assert_eq!(
        next_role(Role::Free, Request::Remaining, rest),
        apply(Role::Resting, GridEffect::None)
    );
    for role in [Role::Analyst, Role::Resting, Role::MilestoneSupport, Role::OnDuty] {
        assert!(next_role(role, Request::Remaining, AT_CAP).is_noop(role));
    }
}

#[test]
fn support_requests_follow_rank() {
    let support = task(TaskKind::SupportActivity, RequestedRole::Analyst);
    assert_eq!(
        next_role(Role::Free, support, TASK_DAY),
        apply(Role::AnalystExpert, GridEffect::None)
    );
    assert_eq!(
        next_role(Role::Free, support, FREE_DAY),
        apply(Role::Analyst, GridEffect::None)
    );
    // quitte la console : la case est libérée
    assert_eq!(
        next_role(Role::OnDuty, support, FREE_DAY),
        apply(Role::Analyst, GridEffect::Vacate)
    );
    assert_eq!(
        next_role(Role::Analyst, support, TASK_DAY),
        apply(Role::AnalystExpert, GridEffect::None)
    );
    assert!(next_role(Role::AnalystExpert, support, FREE_DAY).is_noop(Role::AnalystExpert));
    assert!(next_role(Role::MilestoneSupport, support, TASK_DAY).is_noop(Role::MilestoneSupport));

    let analyst_primary = task(TaskKind::PrimaryActivity, RequestedRole::Analyst);
    assert_eq!(
        next_role(Role::Resting, analyst_primary, TASK_DAY),
        apply(Role::AnalystExpert, GridEffect::None)
    );
}

#[test]
fn milestone_overrides_console_and_analysis() {
    let milestone = task(TaskKind::Milestone, RequestedRole::Console);
    assert_eq!(
        next_role(Role::OnDutyExpert, milestone, TASK_DAY),
        apply(Role::MilestoneSupport, GridEffect::Vacate)
    );
    assert_eq!(
        next_role(Role::AnalystExpert, milestone, TASK_DAY),
        apply(Role::MilestoneSupport, GridEffect::None)
    );
}

#[test]
fn console_requests() {
    let console = task(TaskKind::PrimaryActivity, RequestedRole::Console);
    assert_eq!(
        next_role(Role::Free, console, FREE_DAY),
        apply(Role::OnDuty, GridEffect::Occupy)
    );
    assert_eq!(
        next_role(Role::Resting, console, TASK_DAY),
        apply(Role::OnDutyExpert, GridEffect::Occupy)
    );
    assert_eq!(
        next_role(Role::OnDuty, console, TASK_DAY),
        apply(Role::OnDutyExpert, GridEffect::None)
    );
    assert!(next_role(Role::OnDuty, console, FREE_DAY).is_noop(Role::OnDuty));
    for role in [Role::Analyst, Role::AnalystExpert, Role::MilestoneSupport] {
        assert!(next_role(role, console, TASK_DAY).is_noop(role), "{role}");
    }
}

#[test]
fn allocation_cap_only_blocks_new_days() {
    let support = task(TaskKind::SupportActivity, RequestedRole::Analyst);
    assert_eq!(
        next_role(Role::Free, support, AT_CAP),
        Decision::Refuse(Refusal::AllocationCap)
    );
    let milestone = task(TaskKind::Milestone, RequestedRole::Analyst);
    assert_eq!(
        next_role(Role::OnDuty, milestone, AT_CAP),
        apply(Role::MilestoneSupport, GridEffect::Vacate)
    );
}
