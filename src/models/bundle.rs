//! # 生成张量包数据模型
//!
//! 生成模型输出的平行数组，外层为采样批次维度：
//! - `num_atoms`: 每个材料的原子数
//! - `atom_types`: 所有材料拼接的原子序数
//! - `frac_coords`: 与 `atom_types` 对齐的分数坐标
//! - `lengths` / `angles`: 每个材料一组晶格参数
//!
//! ## 依赖关系
//! - 被 `parsers/` 构造，被 `commands/` 使用
//! - 使用 `models/segment.rs`, `models/coords.rs`, `models/elements.rs`

use crate::error::{GenSampleError, Result};
use crate::models::segment::{compute_segments, Segment, SegmentMode};
use crate::models::{coords, elements, Atom, Crystal, Lattice};

use serde::Deserialize;

/// 完整的生成张量包（只读）
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationBundle {
    pub num_atoms: Vec<Vec<i64>>,
    pub atom_types: Vec<Vec<i64>>,
    pub frac_coords: Vec<Vec<[f64; 3]>>,
    pub lengths: Vec<Vec<[f64; 3]>>,
    pub angles: Vec<Vec<[f64; 3]>>,
}

impl GenerationBundle {
    /// 批次数
    pub fn num_batches(&self) -> usize {
        self.num_atoms.len()
    }

    /// 检查各数组之间的一致性
    pub fn validate(&self) -> Result<()> {
        let batches = self.num_batches();
        let batch_counts = [
            ("atom_types", self.atom_types.len()),
            ("frac_coords", self.frac_coords.len()),
            ("lengths", self.lengths.len()),
            ("angles", self.angles.len()),
        ];
        for (key, count) in batch_counts {
            if count != batches {
                return Err(GenSampleError::InvalidBundle(format!(
                    "'{}' has {} batch(es) but 'num_atoms' has {}",
                    key, count, batches
                )));
            }
        }

        for b in 0..batches {
            let num_atoms = &self.num_atoms[b];

            if let Some(n) = num_atoms.iter().find(|&&n| n < 0) {
                return Err(GenSampleError::InvalidBundle(format!(
                    "batch {}: negative atom count {}",
                    b, n
                )));
            }

            let total: i64 = num_atoms.iter().sum();
            let atom_arrays = [
                ("atom_types", self.atom_types[b].len()),
                ("frac_coords", self.frac_coords[b].len()),
            ];
            for (key, len) in atom_arrays {
                if len as i64 != total {
                    return Err(GenSampleError::InvalidBundle(format!(
                        "batch {}: num_atoms sums to {} but '{}' has {} entries",
                        b, total, key, len
                    )));
                }
            }

            let cell_arrays = [
                ("lengths", self.lengths[b].len()),
                ("angles", self.angles[b].len()),
            ];
            for (key, len) in cell_arrays {
                if len != num_atoms.len() {
                    return Err(GenSampleError::InvalidBundle(format!(
                        "batch {}: {} materials but '{}' has {} entries",
                        b,
                        num_atoms.len(),
                        key,
                        len
                    )));
                }
            }
        }

        Ok(())
    }

    /// 取出一个批次的视图
    pub fn batch(&self, index: usize) -> Result<Batch<'_>> {
        if index >= self.num_batches() {
            return Err(GenSampleError::BatchOutOfRange {
                index,
                available: self.num_batches(),
            });
        }

        let num_atoms = self.num_atoms[index]
            .iter()
            .map(|&n| {
                usize::try_from(n).map_err(|_| {
                    GenSampleError::InvalidBundle(format!("negative atom count {}", n))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Batch {
            index,
            num_atoms,
            atom_types: &self.atom_types[index],
            frac_coords: &self.frac_coords[index],
            lengths: &self.lengths[index],
            angles: &self.angles[index],
        })
    }
}

/// 单个批次的只读视图
#[derive(Debug, Clone)]
pub struct Batch<'a> {
    pub index: usize,
    pub num_atoms: Vec<usize>,
    pub atom_types: &'a [i64],
    pub frac_coords: &'a [[f64; 3]],
    pub lengths: &'a [[f64; 3]],
    pub angles: &'a [[f64; 3]],
}

impl<'a> Batch<'a> {
    pub fn num_materials(&self) -> usize {
        self.num_atoms.len()
    }

    pub fn total_atoms(&self) -> usize {
        self.num_atoms.iter().sum()
    }

    /// 整个批次的笛卡尔坐标
    pub fn cart_coords(&self) -> Result<Vec<[f64; 3]>> {
        coords::frac_to_cart_coords(self.frac_coords, self.lengths, self.angles, &self.num_atoms)
    }

    pub fn segments(&self, mode: SegmentMode) -> Vec<Segment> {
        compute_segments(&self.num_atoms, mode)
    }

    /// 按分段切出第 `id` 个材料
    pub fn material<'s>(
        &'s self,
        id: usize,
        segments: &[Segment],
        cart_coords: &'s [[f64; 3]],
    ) -> Result<Material<'s>> {
        let segment = segments
            .get(id)
            .copied()
            .ok_or(GenSampleError::MaterialOutOfRange {
                requested: id + 1,
                available: segments.len(),
            })?;

        let range = segment.range();
        let out_of_bounds = || {
            GenSampleError::InvalidBundle(format!(
                "material {}: segment [{}, {}) exceeds {} atoms",
                id,
                segment.start,
                segment.end,
                self.atom_types.len()
            ))
        };

        let atom_types = self.atom_types.get(range.clone()).ok_or_else(out_of_bounds)?;
        let frac_coords = self.frac_coords.get(range.clone()).ok_or_else(out_of_bounds)?;
        let cart_coords = cart_coords.get(range).ok_or_else(out_of_bounds)?;
        let lengths = self.lengths.get(id).copied().ok_or_else(out_of_bounds)?;
        let angles = self.angles.get(id).copied().ok_or_else(out_of_bounds)?;

        Ok(Material {
            id,
            atom_types,
            frac_coords,
            cart_coords,
            lengths,
            angles,
        })
    }
}

/// 单个材料的切片数据
#[derive(Debug, Clone)]
pub struct Material<'a> {
    pub id: usize,
    pub atom_types: &'a [i64],
    pub frac_coords: &'a [[f64; 3]],
    pub cart_coords: &'a [[f64; 3]],
    pub lengths: [f64; 3],
    pub angles: [f64; 3],
}

impl<'a> Material<'a> {
    pub fn num_atoms(&self) -> usize {
        self.atom_types.len()
    }

    /// 元素符号列表
    pub fn symbols(&self) -> Result<Vec<&'static str>> {
        self.atom_types.iter().map(|&z| elements::symbol(z)).collect()
    }

    /// 由 lengths/angles 与分数坐标构造独立的晶体结构
    pub fn to_crystal(&self) -> Result<Crystal> {
        let lattice = Lattice::from_lengths_and_angles(self.lengths, self.angles);
        let atoms = self
            .symbols()?
            .into_iter()
            .zip(self.frac_coords.iter())
            .map(|(symbol, &position)| Atom::new(symbol, position))
            .collect();

        Ok(Crystal::new(format!("crystal{}", self.id), lattice, atoms))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 两个材料：H2O (3 原子) + NaCl (2 原子)
    pub(crate) fn sample_bundle() -> GenerationBundle {
        GenerationBundle {
            num_atoms: vec![vec![3, 2]],
            atom_types: vec![vec![1, 1, 8, 11, 17]],
            frac_coords: vec![vec![
                [0.1, 0.1, 0.1],
                [0.2, 0.2, 0.2],
                [0.3, 0.3, 0.3],
                [0.0, 0.0, 0.0],
                [0.5, 0.5, 0.5],
            ]],
            lengths: vec![vec![[5.0, 5.0, 5.0], [4.0, 4.0, 4.0]]],
            angles: vec![vec![[90.0, 90.0, 90.0], [90.0, 90.0, 90.0]]],
        }
    }

    /// 单材料 H + O，立方 5 Å
    pub(crate) fn water_like_bundle() -> GenerationBundle {
        GenerationBundle {
            num_atoms: vec![vec![2]],
            atom_types: vec![vec![1, 8]],
            frac_coords: vec![vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]]],
            lengths: vec![vec![[5.0, 5.0, 5.0]]],
            angles: vec![vec![[90.0, 90.0, 90.0]]],
        }
    }

    #[test]
    fn test_validate_accepts_consistent_bundle() {
        assert!(sample_bundle().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_atom_count_mismatch() {
        let mut bundle = sample_bundle();
        bundle.atom_types[0].pop();
        assert!(matches!(
            bundle.validate(),
            Err(GenSampleError::InvalidBundle(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_cell_entry() {
        let mut bundle = sample_bundle();
        bundle.angles[0].pop();
        assert!(matches!(
            bundle.validate(),
            Err(GenSampleError::InvalidBundle(_))
        ));
    }

    #[test]
    fn test_validate_rejects_batch_count_mismatch() {
        let mut bundle = sample_bundle();
        bundle.lengths.push(vec![]);
        assert!(matches!(
            bundle.validate(),
            Err(GenSampleError::InvalidBundle(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_count() {
        let mut bundle = sample_bundle();
        bundle.num_atoms[0] = vec![6, -1];
        assert!(matches!(
            bundle.validate(),
            Err(GenSampleError::InvalidBundle(_))
        ));
    }

    #[test]
    fn test_batch_out_of_range() {
        let bundle = sample_bundle();
        assert!(matches!(
            bundle.batch(1),
            Err(GenSampleError::BatchOutOfRange {
                index: 1,
                available: 1
            })
        ));
    }

    #[test]
    fn test_material_slices_exact_segments() {
        let bundle = sample_bundle();
        let batch = bundle.batch(0).unwrap();
        let cart = batch.cart_coords().unwrap();
        let segments = batch.segments(SegmentMode::Exact);

        let second = batch.material(1, &segments, &cart).unwrap();
        assert_eq!(second.atom_types, &[11, 17]);
        assert_eq!(second.lengths, [4.0, 4.0, 4.0]);
        assert!((second.cart_coords[1][0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_material_slices_legacy_segments() {
        let bundle = sample_bundle();
        let batch = bundle.batch(0).unwrap();
        let cart = batch.cart_coords().unwrap();
        let segments = batch.segments(SegmentMode::Legacy);

        let first = batch.material(0, &segments, &cart).unwrap();
        assert_eq!(first.atom_types, &[1, 1]);

        // 第二个材料借用上一材料的 O，并丢掉自己的 Cl
        let second = batch.material(1, &segments, &cart).unwrap();
        assert_eq!(second.atom_types, &[8, 11]);
        assert_eq!(second.symbols().unwrap(), vec!["O", "Na"]);
    }

    #[test]
    fn test_material_out_of_range() {
        let bundle = sample_bundle();
        let batch = bundle.batch(0).unwrap();
        let cart = batch.cart_coords().unwrap();
        let segments = batch.segments(SegmentMode::Exact);

        assert!(matches!(
            batch.material(2, &segments, &cart),
            Err(GenSampleError::MaterialOutOfRange {
                requested: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn test_material_to_crystal() {
        let bundle = water_like_bundle();
        let batch = bundle.batch(0).unwrap();
        let cart = batch.cart_coords().unwrap();
        let segments = batch.segments(SegmentMode::Exact);

        let crystal = batch.material(0, &segments, &cart).unwrap().to_crystal().unwrap();
        assert_eq!(crystal.name, "crystal0");
        assert_eq!(crystal.formula(), "HO");
        assert!((crystal.lattice.volume().abs() - 125.0).abs() < 1e-6);
    }
}
