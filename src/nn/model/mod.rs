/*
 * @Description  : DCGAN 的生成器与判别器
 */

mod config;
mod discriminator;
mod generator;

pub use config::DcganConfig;
pub use discriminator::Discriminator;
pub use generator::Generator;
