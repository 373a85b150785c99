//! Mappers between domain models and the public DTOs in `shared`.

use crate::domain::dates;
use crate::domain::models::child::{ChildProfile, Family};
use crate::domain::models::rewards::RewardPoints;
use crate::domain::models::task::{Category, Repeat, TaskTemplate};
use crate::domain::rewards_service::RewardsService;
use crate::domain::view_service::{NowTask, TimeStatus};

pub use crate::domain::calendar_service::InstanceMapper;

pub fn profile_to_dto(profile: &ChildProfile) -> shared::ChildProfile {
    shared::ChildProfile {
        id: profile.id.clone(),
        name: profile.name.clone(),
        avatar_id: profile.avatar_id.clone(),
        age: profile.age,
        created_at: profile.created_at.to_rfc3339(),
    }
}

pub fn family_to_dto(family: &Family) -> shared::Family {
    shared::Family {
        id: family.id.clone(),
        parent_name: family.parent_name.clone(),
        children: family.children.iter().map(profile_to_dto).collect(),
        created_at: family.created_at.to_rfc3339(),
    }
}

pub fn template_to_dto(template: &TaskTemplate) -> shared::TaskTemplate {
    shared::TaskTemplate {
        id: template.id.clone(),
        child_id: template.child_id.clone(),
        title: template.title.clone(),
        color: template.color.clone(),
        icon: template.icon.clone(),
        description: template.description.clone(),
        category: category_to_dto(template.category),
        start: dates::format_iso(template.start),
        end: dates::format_iso(template.end),
        repeat: repeat_to_dto(template.repeat),
        reminders: template.reminders.clone(),
        is_active: template.is_active,
        created_at: template.created_at.to_rfc3339(),
        updated_at: template.updated_at.to_rfc3339(),
    }
}

pub fn points_to_dto(points: &RewardPoints) -> shared::RewardPoints {
    shared::RewardPoints {
        child_id: points.child_id.clone(),
        child_name: points.child_name.clone(),
        total_points: points.total_points,
        daily_points: points.daily_points,
        tasks_completed: points.tasks_completed,
    }
}

pub fn reward_summary_to_dto(points: &RewardPoints) -> shared::RewardSummary {
    shared::RewardSummary {
        stars: RewardsService::stars_for_points(points.total_points),
        points_to_next_star: RewardsService::points_to_next_star(points.total_points),
        points: points_to_dto(points),
    }
}

pub fn now_task_to_dto(task: &NowTask) -> shared::TimeWindowTask {
    shared::TimeWindowTask {
        task: InstanceMapper::to_dto(&task.instance),
        time_status: time_status_to_dto(task.time_status),
        minutes_from_now: task.minutes_from_now,
    }
}

pub fn time_status_to_dto(status: TimeStatus) -> shared::TimeStatus {
    match status {
        TimeStatus::Past => shared::TimeStatus::Past,
        TimeStatus::Current => shared::TimeStatus::Current,
        TimeStatus::Upcoming => shared::TimeStatus::Upcoming,
    }
}

pub fn category_to_dto(category: Category) -> shared::TaskCategory {
    match category {
        Category::Morning => shared::TaskCategory::Morning,
        Category::Afternoon => shared::TaskCategory::Afternoon,
        Category::Evening => shared::TaskCategory::Evening,
        Category::Custom => shared::TaskCategory::Custom,
    }
}

pub fn category_from_dto(category: shared::TaskCategory) -> Category {
    match category {
        shared::TaskCategory::Morning => Category::Morning,
        shared::TaskCategory::Afternoon => Category::Afternoon,
        shared::TaskCategory::Evening => Category::Evening,
        shared::TaskCategory::Custom => Category::Custom,
    }
}

pub fn repeat_to_dto(repeat: Repeat) -> shared::RepeatRule {
    match repeat {
        Repeat::None => shared::RepeatRule::None,
        Repeat::Daily => shared::RepeatRule::Daily,
        Repeat::Weekly => shared::RepeatRule::Weekly,
    }
}

pub fn repeat_from_dto(rule: shared::RepeatRule) -> Repeat {
    match rule {
        shared::RepeatRule::None => Repeat::None,
        shared::RepeatRule::Daily => Repeat::Daily,
        shared::RepeatRule::Weekly => Repeat::Weekly,
    }
}
