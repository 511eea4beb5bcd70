//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use sprite_particles::impl_default;
///
/// struct Tint {
///     alpha: f32,
///     label: String,
/// }
///
/// impl_default!(Tint {
///     alpha: 1.0,
///     label: String::new(),
/// });
///
/// assert_eq!(Tint::default().alpha, 1.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {

    struct Counter {
        ticks: u32,
        name: String,
    }

    impl_default!(Counter {
        ticks: 3,
        name: "frame".to_string(),
    });

    #[test]
    fn test_impl_default() {
        let c = Counter::default();
        assert_eq!(c.ticks, 3);
        assert_eq!(c.name, "frame");
    }
}
