// ==========================================
// 教学计划排课系统 - 学期计划 API
// ==========================================
// 职责: 读取课表/校历 → 引擎排期 → 持久化学期计划
// 校历: 区间跨越的每一年分别读取,未登记的年份使用配置中的兜底节假日
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use futures::future::try_join_all;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::PlanningConfigReader;
use crate::domain::calendar::CalendarYear;
use crate::domain::plan::{Availability, TermPlan};
use crate::domain::topic::Topic;
use crate::engine::orchestrator::{PlanOrchestrator, PlanRequest};
use crate::engine::topic_source::TopicProducer;
use crate::importer::{ImportReport, TopicImporter, ValidationMode};
use crate::perf::PerfGuard;
use crate::repository::{CalendarRepository, TermPlanRepository, TimetableRepository};

// ==========================================
// PlanApi - 学期计划 API
// ==========================================
pub struct PlanApi {
    timetable_repo: Arc<TimetableRepository>,
    calendar_repo: Arc<CalendarRepository>,
    term_plan_repo: Arc<TermPlanRepository>,
    config: Arc<dyn PlanningConfigReader>,
    orchestrator: PlanOrchestrator,
}

impl PlanApi {
    pub fn new(
        timetable_repo: Arc<TimetableRepository>,
        calendar_repo: Arc<CalendarRepository>,
        term_plan_repo: Arc<TermPlanRepository>,
        config: Arc<dyn PlanningConfigReader>,
    ) -> Self {
        Self {
            timetable_repo,
            calendar_repo,
            term_plan_repo,
            config,
            orchestrator: PlanOrchestrator::new(),
        }
    }

    // ==========================================
    // 排期
    // ==========================================

    /// 预览可用课时（不调用课题生成方,不落库）
    pub async fn preview_availability(&self, request: &PlanRequest) -> ApiResult<Availability> {
        let _perf = PerfGuard::new("preview_availability");
        validate_request(request)?;

        let timetable = self.timetable_repo.find_by_group(&request.group_id)?;
        let calendar = self
            .resolve_calendar(request.start_date, request.end_date)
            .await?;
        Ok(self.orchestrator.preview(request, &timetable, &calendar))
    }

    /// 生成并保存学期计划
    ///
    /// # 返回
    /// - Err(EmptyBudget): 区间内无可用课时（不调用课题生成方）
    /// - Err(TopicProducerError): 外部课题生成失败
    #[instrument(skip(self, request, producer), fields(group_id = %request.group_id, subject = %request.subject))]
    pub async fn generate_plan(
        &self,
        request: &PlanRequest,
        producer: &dyn TopicProducer,
    ) -> ApiResult<TermPlan> {
        let _perf = PerfGuard::new("generate_plan");

        let plan = self.build_plan(request, producer).await?;
        self.term_plan_repo.insert(&plan)?;
        log_plan(&plan);
        Ok(plan)
    }

    /// 批量生成（多个科目并发调用课题生成方）
    ///
    /// 全部成功后才落库; 任一失败返回第一个错误且不保存任何计划
    pub async fn generate_plans(
        &self,
        requests: &[PlanRequest],
        producer: &dyn TopicProducer,
    ) -> ApiResult<Vec<TermPlan>> {
        let _perf = PerfGuard::new("generate_plans");

        let plans = try_join_all(
            requests
                .iter()
                .map(|request| self.build_plan(request, producer)),
        )
        .await?;

        for plan in &plans {
            self.term_plan_repo.insert(plan)?;
            log_plan(plan);
        }
        Ok(plans)
    }

    async fn build_plan(
        &self,
        request: &PlanRequest,
        producer: &dyn TopicProducer,
    ) -> ApiResult<TermPlan> {
        validate_request(request)?;

        let timetable = self.timetable_repo.find_by_group(&request.group_id)?;
        if timetable.is_empty() {
            warn!(group_id = %request.group_id, "教学班没有周课表");
        }
        let calendar = self
            .resolve_calendar(request.start_date, request.end_date)
            .await?;

        let outcome = self
            .orchestrator
            .execute(request, &timetable, &calendar, producer)
            .await?;

        Ok(TermPlan {
            plan_id: Uuid::new_v4().to_string(),
            group_id: request.group_id.clone(),
            subject: request.subject.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            total_slots_available: outcome.availability.total_slots,
            topics: outcome.topics,
            created_at: Local::now().naive_local(),
        })
    }

    /// 读取区间内各年份校历并合并
    async fn resolve_calendar(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<CalendarYear> {
        let mut calendars = Vec::new();
        for year in start.year()..=end.year().max(start.year()) {
            let calendar = match self.calendar_repo.find_by_year(year)? {
                Some(calendar) => calendar,
                None => {
                    info!(year, "未登记校历，使用兜底节假日");
                    self.config
                        .get_fallback_calendar(year)
                        .await
                        .map_err(|e| ApiError::ConfigError(e.to_string()))?
                }
            };
            calendars.push(calendar);
        }
        Ok(CalendarYear::merged(start.year(), calendars.iter()))
    }

    // ==========================================
    // 课题清单
    // ==========================================

    /// 从文件读取课题清单（校验模式取自配置）
    pub async fn read_topics_file(&self, path: &Path) -> ApiResult<ImportReport<Vec<Topic>>> {
        let strict = self
            .config
            .get_strict_input_validation()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let importer = TopicImporter::new(ValidationMode::from_strict_flag(strict));
        Ok(importer.import_file(path)?)
    }

    // ==========================================
    // 查询 / 删除
    // ==========================================

    pub fn get_plan(&self, plan_id: &str) -> ApiResult<TermPlan> {
        self.term_plan_repo
            .find_by_id(plan_id)?
            .ok_or_else(|| ApiError::NotFound(format!("学期计划(id={})不存在", plan_id)))
    }

    /// 列出教学班的全部计划（最新在前）
    pub fn list_plans(&self, group_id: &str) -> ApiResult<Vec<TermPlan>> {
        Ok(self.term_plan_repo.list_by_group(group_id)?)
    }

    pub fn delete_plan(&self, plan_id: &str) -> ApiResult<()> {
        let affected = self.term_plan_repo.delete(plan_id)?;
        if affected == 0 {
            return Err(ApiError::NotFound(format!("学期计划(id={})不存在", plan_id)));
        }
        info!(plan_id, "学期计划已删除");
        Ok(())
    }
}

fn validate_request(request: &PlanRequest) -> ApiResult<()> {
    if request.group_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("教学班不能为空".to_string()));
    }
    if request.start_date > request.end_date {
        return Err(ApiError::InvalidInput(format!(
            "开始日期 {} 晚于结束日期 {}",
            request.start_date, request.end_date
        )));
    }
    Ok(())
}

fn log_plan(plan: &TermPlan) {
    let summary = plan.summary();
    info!(
        plan_id = %plan.plan_id,
        total_slots = plan.total_slots_available,
        core = summary.core_count,
        voluntary_self_study = summary.voluntary_self_study_count,
        forced_overflow = summary.forced_overflow_count,
        unused_slots = summary.unused_slots,
        "学期计划已生成"
    );
}
