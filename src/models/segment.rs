//! # 材料分段索引
//!
//! 由每个材料的原子数累加和计算其在拼接原子数组中的 `[start, end)` 区间。
//!
//! ## 分段模式
//! - `Legacy`: 与原始导出脚本一致，边界为 `cumsum - 1`。
//!   对 `[3, 2]` 得到 `[[0,2],[2,4]]`：第一个材料少一个原子，
//!   第 i>0 个材料借用上一个材料的最后一个原子并丢掉自己的最后一个原子，长度不变。
//!   开头的零原子材料饱和为空区间 `[0,0]`，不同于原脚本 `[0:-1]` 回绕取到除最后一个外的全部原子。
//! - `Exact`: 精确边界，对 `[3, 2]` 得到 `[[0,3],[3,5]]`。
//!
//! ## 依赖关系
//! - 被 `models/bundle.rs`, `commands/` 使用
//! - 无外部模块依赖

use std::ops::Range;

/// 分段模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentMode {
    /// 复现 `cumsum - 1` 偏移
    #[default]
    Legacy,
    /// 精确的原子数边界
    Exact,
}

/// 单个材料在拼接数组中的区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Segment { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// 根据原子数计算所有材料的分段
pub fn compute_segments(num_atoms: &[usize], mode: SegmentMode) -> Vec<Segment> {
    let cumsum: Vec<usize> = num_atoms
        .iter()
        .scan(0usize, |acc, &n| {
            *acc += n;
            Some(*acc)
        })
        .collect();

    cumsum
        .iter()
        .enumerate()
        .map(|(i, &end)| {
            let prev = if i == 0 { None } else { Some(cumsum[i - 1]) };
            match mode {
                SegmentMode::Legacy => Segment::new(
                    prev.map(|p| p.saturating_sub(1)).unwrap_or(0),
                    end.saturating_sub(1),
                ),
                SegmentMode::Exact => Segment::new(prev.unwrap_or(0), end),
            }
        })
        .collect()
}
