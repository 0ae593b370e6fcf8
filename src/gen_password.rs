//! 密码生成模块
//!
//! 生成易读的密码（例如 `rol86din`，而不是难记的 `K8Yn9muL`）：
//! 辅音/元音交替的字母段 + 数字段 + 第二个字母段。
//!
//! 随机源为 `rand::thread_rng()`，由操作系统熵初始化的进程级PRNG；
//! 不保证密码学强度。

use crate::error::{AppError, Result};
use rand::Rng;

/// 元音字母
pub const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// 辅音字母（小写字母中去掉元音）
pub const CONSONANTS: [char; 21] = [
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v', 'w',
    'x', 'y', 'z',
];

const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// 易读密码生成器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NicePassGenerator {
    alpha_length: usize,
    numeric_length: usize,
}

impl Default for NicePassGenerator {
    fn default() -> Self {
        Self::new(6, 3)
    }
}

impl NicePassGenerator {
    /// 创建生成器
    ///
    /// # 参数
    /// * `alpha_length` - 字母总数，前一段取 `ceil(alpha_length / 2)`
    /// * `numeric_length` - 中间数字段长度
    pub fn new(alpha_length: usize, numeric_length: usize) -> Self {
        Self {
            alpha_length,
            numeric_length,
        }
    }

    /// 从带符号长度创建，负数返回 `InvalidArgument`
    pub fn try_new(alpha_length: i64, numeric_length: i64) -> Result<Self> {
        let alpha = usize::try_from(alpha_length).map_err(|_| {
            AppError::invalid_argument(format!("alpha length must be >= 0, got {alpha_length}"))
        })?;
        let numeric = usize::try_from(numeric_length).map_err(|_| {
            AppError::invalid_argument(format!(
                "numeric length must be >= 0, got {numeric_length}"
            ))
        })?;
        Ok(Self::new(alpha, numeric))
    }

    /// 密码总长度
    pub fn len(&self) -> usize {
        self.alpha_length + self.numeric_length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 第一段字母长度
    pub fn first_part_len(&self) -> usize {
        self.alpha_length - self.alpha_length / 2
    }

    /// 使用线程本地随机源生成密码
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// 使用指定随机源生成密码
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let first = self.first_part_len();
        let last = self.alpha_length - first;

        let mut password = String::with_capacity(self.len());
        push_alpha(&mut password, rng, first);
        push_numeric(&mut password, rng, self.numeric_length);
        push_alpha(&mut password, rng, last);
        password
    }
}

/// 按默认长度（6字母 + 3数字）生成密码
pub fn generate_password() -> String {
    NicePassGenerator::default().generate()
}

fn push_alpha<R: Rng + ?Sized>(out: &mut String, rng: &mut R, len: usize) {
    for i in 0..len {
        let c = if i % 2 == 0 {
            CONSONANTS[rng.gen_range(0..CONSONANTS.len())]
        } else {
            VOWELS[rng.gen_range(0..VOWELS.len())]
        };
        out.push(c);
    }
}

fn push_numeric<R: Rng + ?Sized>(out: &mut String, rng: &mut R, len: usize) {
    for _ in 0..len {
        out.push(DIGITS[rng.gen_range(0..DIGITS.len())]);
    }
}
