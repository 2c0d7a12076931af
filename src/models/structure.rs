//! # 晶体结构数据模型
//!
//! 定义导出与交叉校验共用的晶体结构表示。
//!
//! ## 晶格约定
//! 与 CDVAE / pymatgen 一致：c 轴沿 z，a 轴位于 xz 平面。
//!
//! ## 依赖关系
//! - 被 `models/coords.rs`, `parsers/cif.rs`, `writers/` 使用
//! - 无外部模块依赖

/// 晶格参数表示
#[derive(Debug, Clone)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let alpha_rad = alpha.to_radians();
        let beta_rad = beta.to_radians();
        let gamma_rad = gamma.to_radians();

        let (sin_alpha, cos_alpha) = alpha_rad.sin_cos();
        let (sin_beta, cos_beta) = beta_rad.sin_cos();
        let cos_gamma = gamma_rad.cos();

        // 倒易角 gamma*
        let val = ((cos_alpha * cos_beta - cos_gamma) / (sin_alpha * sin_beta)).clamp(-1.0, 1.0);
        let gamma_star = val.acos();

        let a_vec = [a * sin_beta, 0.0, a * cos_beta];
        let b_vec = [
            -b * sin_alpha * gamma_star.cos(),
            b * sin_alpha * gamma_star.sin(),
            b * cos_alpha,
        ];
        let c_vec = [0.0, 0.0, c];

        Lattice {
            matrix: [a_vec, b_vec, c_vec],
        }
    }

    /// 从 lengths / angles 三元组创建
    pub fn from_lengths_and_angles(lengths: [f64; 3], angles: [f64; 3]) -> Self {
        Self::from_parameters(
            lengths[0], lengths[1], lengths[2], angles[0], angles[1], angles[2],
        )
    }

    /// 晶格参数 (a, b, c, alpha, beta, gamma)，角度单位：度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [va, vb, vc] = self.matrix;
        let (a, b, c) = (norm(va), norm(vb), norm(vc));

        let angle = |u: [f64; 3], v: [f64; 3], lu: f64, lv: f64| {
            (dot(u, v) / (lu * lv)).clamp(-1.0, 1.0).acos().to_degrees()
        };

        (a, b, c, angle(vb, vc, b, c), angle(va, vc, a, c), angle(va, vb, a, b))
    }

    /// 晶胞体积 a · (b × c)，左手系时为负
    pub fn volume(&self) -> f64 {
        let [va, vb, vc] = self.matrix;
        dot(va, cross(vb, vc))
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

fn dot(u: [f64; 3], v: [f64; 3]) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn cross(u: [f64; 3], v: [f64; 3]) -> [f64; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn norm(u: [f64; 3]) -> f64 {
    dot(u, u).sqrt()
}

/// 原子信息
#[derive(Debug, Clone)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 原子标签，缺省时写出为 `<元素><序号>`
    pub label: Option<String>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 晶体结构
#[derive(Debug, Clone)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    /// 按元素统计原子数（字母序）
    fn element_counts(&self) -> Vec<(&str, usize)> {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts.into_iter().collect()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        self.element_counts()
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 化学式求和形式，如 "H1 O1"
    pub fn formula_sum(&self) -> String {
        self.element_counts()
            .into_iter()
            .map(|(el, count)| format!("{}{}", el, count))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 所有原子的笛卡尔坐标
    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|atom| self.lattice.frac_to_cart(atom.position))
            .collect()
    }
}
