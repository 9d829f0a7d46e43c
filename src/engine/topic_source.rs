// ==========================================
// 教学计划排课系统 - 课题来源接口
// ==========================================
// 职责: 定义外部课题生成方的 trait,实现依赖倒置
// 说明: 引擎层只定义接口; 具体生成方（如大模型调用）由外部实现
// 约定: total_slots 仅作为预算提示,超出部分由排期引擎的溢出规则处理
// ==========================================

use crate::domain::topic::Topic;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// TopicRequest - 课题生成请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRequest {
    pub group_id: String,
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 可用课时数（预算提示）
    pub total_slots: usize,
}

// ==========================================
// Trait: TopicProducer
// ==========================================
/// 外部课题生成方
///
/// 返回的课题顺序即为排期顺序; 每个课题已标记是否自学
#[async_trait]
pub trait TopicProducer: Send + Sync {
    async fn produce_topics(&self, request: &TopicRequest) -> anyhow::Result<Vec<Topic>>;
}

// ==========================================
// StaticTopicProducer - 固定课题列表
// ==========================================
// 用途: 课题已知（文件导入/命令行/测试）时直接返回
#[derive(Debug, Clone, Default)]
pub struct StaticTopicProducer {
    topics: Vec<Topic>,
}

impl StaticTopicProducer {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }
}

#[async_trait]
impl TopicProducer for StaticTopicProducer {
    async fn produce_topics(&self, request: &TopicRequest) -> anyhow::Result<Vec<Topic>> {
        let core = self.topics.iter().filter(|t| !t.is_self_study).count();
        if core > request.total_slots {
            tracing::debug!(
                subject = %request.subject,
                core_topics = core,
                total_slots = request.total_slots,
                "固定课题数超出预算提示"
            );
        }
        Ok(self.topics.clone())
    }
}
