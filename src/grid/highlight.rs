use std::f64::consts::PI;
use std::time::{Duration, Instant};

use super::change_tracker::ChangeRecord;
use super::data_structures::{ColumnKey, GridConfig};

/// 高亮动画 - 把变更记录的年龄映射为 [0, 1] 的闪烁强度
///
/// 强度 = 包络 × 半正弦脉冲：
/// - 超过总时长后强度为0
/// - 包络在进度达到 fade_out_start 前保持满幅，之后线性衰减到0
/// - 脉冲按固定周期取 sin(phase·π)，闪烁呈脉动而非常亮
///
/// 纯函数 (时间, 记录) -> 强度；渲染面在仍有强度大于0的记录时
/// 持续请求重绘，全部衰减或被清扫后停止
#[derive(Debug, Clone, Copy)]
pub struct HighlightAnimator {
    flash_duration_ms: f64,
    flash_period_ms: f64,
    fade_out_start: f64,
}

impl HighlightAnimator {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            flash_duration_ms: config.flash_duration_ms as f64,
            flash_period_ms: config.flash_period_ms as f64,
            fade_out_start: config.fade_out_start as f64,
        }
    }

    /// 经过时间 -> 强度
    pub fn intensity(&self, elapsed: Duration) -> f32 {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if elapsed_ms >= self.flash_duration_ms {
            return 0.0;
        }

        let fade_start = self.flash_duration_ms * self.fade_out_start;
        let envelope = if elapsed_ms > fade_start {
            1.0 - (elapsed_ms - fade_start) / (self.flash_duration_ms - fade_start)
        } else {
            1.0
        };

        let phase = (elapsed_ms % self.flash_period_ms) / self.flash_period_ms;
        ((phase * PI).sin() * envelope) as f32
    }

    /// 节点级强度：新节点或任一字段发生过变更
    pub fn record_intensity(&self, record: &ChangeRecord, now: Instant) -> f32 {
        if record.is_new || !record.updated_fields.is_empty() {
            self.intensity(now.duration_since(record.timestamp))
        } else {
            0.0
        }
    }

    /// 字段级强度：新节点闪烁所有列，否则只闪烁发生变更的列
    pub fn field_intensity(&self, record: &ChangeRecord, key: ColumnKey, now: Instant) -> f32 {
        if record.affects(key) {
            self.intensity(now.duration_since(record.timestamp))
        } else {
            0.0
        }
    }

    /// 记录是否仍在闪烁时长内（脉冲瞬时过零点也算活跃）
    pub fn is_active(&self, record: &ChangeRecord, now: Instant) -> bool {
        let elapsed_ms = now.duration_since(record.timestamp).as_secs_f64() * 1000.0;
        elapsed_ms < self.flash_duration_ms
    }

    /// 是否仍有未衰减完的记录（决定是否继续请求重绘）
    pub fn any_active<'a>(
        &self,
        mut records: impl Iterator<Item = &'a ChangeRecord>,
        now: Instant,
    ) -> bool {
        records.any(|record| self.is_active(record, now))
    }
}
