// ==========================================
// PlanAssigner 集成测试
// ==========================================
// 测试目标: 课时线性消耗、溢出强制转自学、主动自学不占课时
// ==========================================


use teaching_plan::domain::{
    CalendarYear, DaySchedule, TimeSlot, Topic, TopicPriority, Weekday, WeeklyTimetable,
};
use teaching_plan::engine::{AvailabilityCalculator, PlanAssigner};
use test_helpers::d;

fn schedule_with_slots(days: &[(u32, usize)]) -> Vec<DaySchedule> {
    days.iter()
        .map(|&(day, count)| {
            let date = d(2026, 1, day);
            DaySchedule {
                date,
                day_of_week: Weekday::from(chrono::Datelike::weekday(&date)),
                slots: (0..count)
                    .map(|i| TimeSlot::new(format!("{:02}:00", 9 + i), format!("{:02}:00", 10 + i)))
                    .collect(),
                is_override: false,
            }
        })
        .collect()
}

fn core_topics(n: usize) -> Vec<Topic> {
    (0..n)
        .map(|i| Topic::core(format!("Topic {}", i + 1), i as i32 + 1))
        .collect()
}

#[test]
fn test_more_topics_than_slots_overflow_tail() {
    // 2026-01-05 周一 2 节, 2026-01-06 周二 1 节 → M = 3
    let schedule = schedule_with_slots(&[(5, 2), (6, 1)]);
    let topics = core_topics(5);

    let assigned = PlanAssigner::new().assign(&topics, &schedule);

    assert_eq!(assigned.len(), 5);
    let core: Vec<_> = assigned.iter().filter(|t| t.is_core()).collect();
    assert_eq!(core.len(), 3);
    assert!(assigned[..3].iter().all(|t| t.priority == TopicPriority::Core));
    assert_eq!(assigned[0].scheduled_date, Some(d(2026, 1, 5)));
    assert_eq!(assigned[1].scheduled_date, Some(d(2026, 1, 5)));
    assert_eq!(assigned[2].scheduled_date, Some(d(2026, 1, 6)));
    assert_eq!(
        assigned[1].scheduled_slot.as_ref().map(|s| s.start_time.as_str()),
        Some("10:00")
    );

    for overflow in &assigned[3..] {
        assert_eq!(overflow.priority, TopicPriority::SelfStudy);
        assert!(overflow.forced_overflow);
        assert_eq!(overflow.scheduled_date, None);
        assert_eq!(overflow.scheduled_slot, None);
    }
}

#[test]
fn test_core_dates_non_decreasing_and_titles_preserved() {
    let schedule = schedule_with_slots(&[(5, 1), (6, 2), (7, 1), (8, 3)]);
    let topics = core_topics(6);

    let assigned = PlanAssigner::new().assign(&topics, &schedule);

    let dates: Vec<_> = assigned.iter().filter_map(|t| t.scheduled_date).collect();
    assert_eq!(dates.len(), 6);
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    for (input, output) in topics.iter().zip(&assigned) {
        assert_eq!(&output.topic, input);
    }
}

#[test]
fn test_interleaved_self_study_with_one_slot() {
    let schedule = schedule_with_slots(&[(5, 1)]);
    let topics = vec![
        Topic::core("Intro", 1),
        Topic::self_study("Reading", 2),
        Topic::core("Advanced", 3),
    ];

    let assigned = PlanAssigner::new().assign(&topics, &schedule);

    assert_eq!(assigned[0].priority, TopicPriority::Core);
    assert_eq!(assigned[0].scheduled_date, Some(d(2026, 1, 5)));

    assert_eq!(assigned[1].priority, TopicPriority::SelfStudy);
    assert!(!assigned[1].forced_overflow);
    assert_eq!(assigned[1].scheduled_date, None);

    assert_eq!(assigned[2].priority, TopicPriority::SelfStudy);
    assert!(assigned[2].forced_overflow);
    assert_eq!(assigned[2].scheduled_date, None);
}

#[test]
fn test_self_study_never_consumes_slots() {
    let schedule = schedule_with_slots(&[(5, 2)]);
    let topics = vec![
        Topic::self_study("Pre-reading", 1),
        Topic::core("Intro", 2),
        Topic::self_study("Lab notes", 3),
        Topic::core("Testing", 4),
    ];

    let assigned = PlanAssigner::new().assign(&topics, &schedule);

    assert_eq!(
        assigned[1].scheduled_slot.as_ref().map(|s| s.start_time.as_str()),
        Some("09:00")
    );
    assert_eq!(
        assigned[3].scheduled_slot.as_ref().map(|s| s.start_time.as_str()),
        Some("10:00")
    );
    assert!(assigned.iter().all(|t| !t.forced_overflow));
}

#[test]
fn test_fewer_topics_leave_slots_unused() {
    let schedule = schedule_with_slots(&[(5, 2), (6, 2)]);
    let assigned = PlanAssigner::new().assign(&core_topics(1), &schedule);

    let summary = teaching_plan::domain::PlanSummary::from_topics(&assigned, 4);
    assert_eq!(summary.core_count, 1);
    assert_eq!(summary.unused_slots, 3);
    assert!(!summary.has_overflow());
}

#[test]
fn test_empty_inputs() {
    let assigner = PlanAssigner::new();
    assert!(assigner.assign(&[], &schedule_with_slots(&[(5, 2)])).is_empty());

    let assigned = assigner.assign(&core_topics(2), &[]);
    assert!(assigned.iter().all(|t| t.forced_overflow));
}

#[test]
fn test_assignment_is_idempotent() {
    let timetable = WeeklyTimetable::new()
        .with_slot(Weekday::Thursday, TimeSlot::new("09:00", "10:00"))
        .with_slot(Weekday::Friday, TimeSlot::new("10:00", "11:00"));
    let availability = AvailabilityCalculator::new().calculate(
        d(2026, 1, 1),
        d(2026, 1, 31),
        &timetable,
        &CalendarYear::new(2026),
        None,
    );
    let mut topics = core_topics(12);
    topics.insert(4, Topic::self_study("Reading", 99));

    let assigner = PlanAssigner::new();
    let first = assigner.assign(&topics, &availability.schedule);
    let second = assigner.assign(&topics, &availability.schedule);
    assert_eq!(first, second);
}
