/*
 * @Description  : Graph 模块：计算图的核心实现
 *
 * 公开 API：
 * - `Graph`: 用户级句柄（带名字作用域）
 * - `GraphInner`: 底层实现（节点、注册表、执行）
 * - `GraphError`: 错误类型
 */

mod builders;
mod error;
mod handle;
mod inner;

pub use builders::FusedBatchNormOutput;
pub use error::GraphError;
pub use handle::Graph;
pub use inner::GraphInner;
