use crate::service::QueryService;
use std::sync::Arc;

/// API 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 查询服务
    pub service: Arc<QueryService>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(service: QueryService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
