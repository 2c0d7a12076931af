//! # safetensors 张量包解析器
//!
//! 读取由 `safetensors.torch.save_file` 保存的生成张量包。
//!
//! ## 张量布局
//! ```text
//! num_atoms    [B, M]      I64 / I32 / U8
//! atom_types   [B, A]      I64 / I32 / U8
//! frac_coords  [B, A, 3]   F32 / F64
//! lengths      [B, M, 3]   F32 / F64
//! angles       [B, M, 3]   F32 / F64
//! ```
//! 秩比预期少一的张量视为单个批次。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/bundle.rs`
//! - 使用 `safetensors` crate

use crate::error::{GenSampleError, Result};
use crate::models::GenerationBundle;

use safetensors::tensor::TensorView;
use safetensors::{Dtype, SafeTensors};
use std::fs;
use std::path::Path;

/// 解析 .safetensors 文件
pub fn parse_safetensors_file(path: &Path) -> Result<GenerationBundle> {
    let bytes = fs::read(path).map_err(|e| GenSampleError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_safetensors_bytes(&bytes, &path.display().to_string())
}

/// 从内存字节解析张量包
pub fn parse_safetensors_bytes(bytes: &[u8], name: &str) -> Result<GenerationBundle> {
    let tensors = SafeTensors::deserialize(bytes).map_err(|e| GenSampleError::ParseError {
        format: "safetensors".to_string(),
        path: name.to_string(),
        reason: e.to_string(),
    })?;

    let num_atoms = batched_ints(&tensors, "num_atoms", name)?;
    let atom_types = batched_ints(&tensors, "atom_types", name)?;
    let frac_coords = batched_triples(&tensors, "frac_coords", name)?;
    let lengths = batched_triples(&tensors, "lengths", name)?;
    let angles = batched_triples(&tensors, "angles", name)?;

    Ok(GenerationBundle {
        num_atoms,
        atom_types,
        frac_coords,
        lengths,
        angles,
    })
}

fn tensor<'data>(
    tensors: &SafeTensors<'data>,
    key: &str,
    name: &str,
) -> Result<TensorView<'data>> {
    tensors
        .tensor(key)
        .map_err(|_| GenSampleError::MissingTensor {
            key: key.to_string(),
            path: name.to_string(),
        })
}

/// `[B, N]` 整数张量 → 每批一个 Vec
fn batched_ints(tensors: &SafeTensors<'_>, key: &str, name: &str) -> Result<Vec<Vec<i64>>> {
    let view = tensor(tensors, key, name)?;
    let data = ints(&view, key)?;
    let (batches, per_batch) = batch_layout(view.shape(), 2, key)?;

    Ok(split_batches(data, batches, per_batch))
}

/// `[B, N, 3]` 浮点张量 → 每批一组三元组
fn batched_triples(
    tensors: &SafeTensors<'_>,
    key: &str,
    name: &str,
) -> Result<Vec<Vec<[f64; 3]>>> {
    let view = tensor(tensors, key, name)?;
    let shape = view.shape();

    if shape.last() != Some(&3) {
        return Err(GenSampleError::InvalidBundle(format!(
            "'{}' must have a trailing dimension of 3, got shape {:?}",
            key, shape
        )));
    }

    let data = floats(&view, key)?;
    let (batches, per_batch) = batch_layout(&shape[..shape.len() - 1], 2, key)?;

    let triples: Vec<[f64; 3]> = data
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    Ok(split_batches(triples, batches, per_batch))
}

/// 由形状推断 (批次数, 每批元素数)
fn batch_layout(shape: &[usize], rank: usize, key: &str) -> Result<(usize, usize)> {
    if shape.len() == rank {
        Ok((shape[0], shape[1..].iter().product()))
    } else if shape.len() + 1 == rank {
        Ok((1, shape.iter().product()))
    } else {
        Err(GenSampleError::InvalidBundle(format!(
            "'{}' has unexpected shape {:?}",
            key, shape
        )))
    }
}

fn split_batches<T>(data: Vec<T>, batches: usize, per_batch: usize) -> Vec<Vec<T>> {
    let mut iter = data.into_iter();
    (0..batches)
        .map(|_| iter.by_ref().take(per_batch).collect())
        .collect()
}

fn le_bytes<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(chunk);
    buf
}

fn ints(view: &TensorView<'_>, key: &str) -> Result<Vec<i64>> {
    let data = view.data();
    match view.dtype() {
        Dtype::I64 => Ok(data
            .chunks_exact(8)
            .map(|c| i64::from_le_bytes(le_bytes(c)))
            .collect()),
        Dtype::I32 => Ok(data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(le_bytes(c)) as i64)
            .collect()),
        Dtype::U8 => Ok(data.iter().map(|&b| b as i64).collect()),
        other => Err(GenSampleError::UnsupportedDtype {
            key: key.to_string(),
            dtype: format!("{:?}", other),
        }),
    }
}

fn floats(view: &TensorView<'_>, key: &str) -> Result<Vec<f64>> {
    let data = view.data();
    match view.dtype() {
        Dtype::F64 => Ok(data
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes(le_bytes(c)))
            .collect()),
        Dtype::F32 => Ok(data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(le_bytes(c)) as f64)
            .collect()),
        other => Err(GenSampleError::UnsupportedDtype {
            key: key.to_string(),
            dtype: format!("{:?}", other),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 用于测试的原始张量
    pub(crate) enum RawTensor {
        I64(Vec<i64>, Vec<usize>),
        F32(Vec<f32>, Vec<usize>),
        F64(Vec<f64>, Vec<usize>),
        F16(Vec<u8>, Vec<usize>),
    }

    impl RawTensor {
        fn bytes(&self) -> Vec<u8> {
            match self {
                RawTensor::I64(v, _) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
                RawTensor::F32(v, _) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
                RawTensor::F64(v, _) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
                RawTensor::F16(v, _) => v.clone(),
            }
        }

        fn dtype(&self) -> Dtype {
            match self {
                RawTensor::I64(..) => Dtype::I64,
                RawTensor::F32(..) => Dtype::F32,
                RawTensor::F64(..) => Dtype::F64,
                RawTensor::F16(..) => Dtype::F16,
            }
        }

        fn shape(&self) -> Vec<usize> {
            match self {
                RawTensor::I64(_, s)
                | RawTensor::F32(_, s)
                | RawTensor::F64(_, s)
                | RawTensor::F16(_, s) => s.clone(),
            }
        }
    }

    /// 将若干张量序列化为 safetensors 字节
    pub(crate) fn serialize_tensors(tensors: Vec<(&str, RawTensor)>) -> Vec<u8> {
        let buffers: Vec<(String, Dtype, Vec<usize>, Vec<u8>)> = tensors
            .into_iter()
            .map(|(k, t)| (k.to_string(), t.dtype(), t.shape(), t.bytes()))
            .collect();

        let views: Vec<(String, TensorView<'_>)> = buffers
            .iter()
            .map(|(k, dtype, shape, data)| {
                (
                    k.clone(),
                    TensorView::new(*dtype, shape.clone(), data).unwrap(),
                )
            })
            .collect();

        let info: Option<HashMap<String, String>> = None;
        safetensors::tensor::serialize(views, &info).unwrap()
    }

    /// H + O 单材料张量包（带批次维度，f32 坐标）
    pub(crate) fn water_like_tensors() -> Vec<(&'static str, RawTensor)> {
        vec![
            ("num_atoms", RawTensor::I64(vec![2], vec![1, 1])),
            ("atom_types", RawTensor::I64(vec![1, 8], vec![1, 2])),
            (
                "frac_coords",
                RawTensor::F32(vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5], vec![1, 2, 3]),
            ),
            ("lengths", RawTensor::F32(vec![5.0, 5.0, 5.0], vec![1, 1, 3])),
            (
                "angles",
                RawTensor::F32(vec![90.0, 90.0, 90.0], vec![1, 1, 3]),
            ),
        ]
    }

    #[test]
    fn test_parse_batched_bundle() {
        let bytes = serialize_tensors(water_like_tensors());
        let bundle = parse_safetensors_bytes(&bytes, "memory").unwrap();

        assert_eq!(bundle.num_batches(), 1);
        assert_eq!(bundle.num_atoms, vec![vec![2]]);
        assert_eq!(bundle.atom_types, vec![vec![1, 8]]);
        assert_eq!(bundle.frac_coords[0][1], [0.5, 0.5, 0.5]);
        assert_eq!(bundle.lengths[0][0], [5.0, 5.0, 5.0]);
        assert!(bundle.validate().is_ok());
    }

    #[test]
    fn test_parse_two_batches() {
        let bytes = serialize_tensors(vec![
            ("num_atoms", RawTensor::I64(vec![1, 1], vec![2, 1])),
            ("atom_types", RawTensor::I64(vec![6, 14], vec![2, 1])),
            (
                "frac_coords",
                RawTensor::F64(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6], vec![2, 1, 3]),
            ),
            (
                "lengths",
                RawTensor::F64(vec![3.0, 3.0, 3.0, 4.0, 4.0, 4.0], vec![2, 1, 3]),
            ),
            (
                "angles",
                RawTensor::F64(vec![90.0; 6], vec![2, 1, 3]),
            ),
        ]);
        let bundle = parse_safetensors_bytes(&bytes, "memory").unwrap();

        assert_eq!(bundle.num_batches(), 2);
        assert_eq!(bundle.atom_types, vec![vec![6], vec![14]]);
        assert_eq!(bundle.frac_coords[1][0], [0.4, 0.5, 0.6]);
        assert_eq!(bundle.lengths[1][0], [4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_parse_unbatched_bundle() {
        let bytes = serialize_tensors(vec![
            ("num_atoms", RawTensor::I64(vec![2], vec![1])),
            ("atom_types", RawTensor::I64(vec![1, 8], vec![2])),
            (
                "frac_coords",
                RawTensor::F64(vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5], vec![2, 3]),
            ),
            ("lengths", RawTensor::F64(vec![5.0, 5.0, 5.0], vec![1, 3])),
            ("angles", RawTensor::F64(vec![90.0, 90.0, 90.0], vec![1, 3])),
        ]);
        let bundle = parse_safetensors_bytes(&bytes, "memory").unwrap();

        assert_eq!(bundle.num_batches(), 1);
        assert_eq!(bundle.frac_coords[0].len(), 2);
    }

    #[test]
    fn test_missing_tensor() {
        let mut tensors = water_like_tensors();
        tensors.retain(|(k, _)| *k != "angles");
        let bytes = serialize_tensors(tensors);

        let result = parse_safetensors_bytes(&bytes, "memory");
        assert!(matches!(
            result,
            Err(GenSampleError::MissingTensor { ref key, .. }) if key == "angles"
        ));
    }

    #[test]
    fn test_unsupported_dtype() {
        let mut tensors = water_like_tensors();
        tensors.retain(|(k, _)| *k != "lengths");
        tensors.push(("lengths", RawTensor::F16(vec![0u8; 6], vec![1, 1, 3])));
        let bytes = serialize_tensors(tensors);

        let result = parse_safetensors_bytes(&bytes, "memory");
        assert!(matches!(
            result,
            Err(GenSampleError::UnsupportedDtype { ref key, .. }) if key == "lengths"
        ));
    }

    #[test]
    fn test_bad_trailing_dimension() {
        let mut tensors = water_like_tensors();
        tensors.retain(|(k, _)| *k != "angles");
        tensors.push((
            "angles",
            RawTensor::F32(vec![90.0, 90.0], vec![1, 1, 2]),
        ));
        let bytes = serialize_tensors(tensors);

        let result = parse_safetensors_bytes(&bytes, "memory");
        assert!(matches!(result, Err(GenSampleError::InvalidBundle(_))));
    }

    #[test]
    fn test_garbage_bytes() {
        let result = parse_safetensors_bytes(b"not a safetensors file", "memory");
        assert!(matches!(result, Err(GenSampleError::ParseError { .. })));
    }
}
