mod cloud;
mod convection;
mod humidity;
mod lapserate;
mod radiation;
mod surface;
mod upwelling;

pub use cloud::{ClearSky, ConstantCloud, ConstantCloudParameters};
pub use convection::{HardAdjustment, NonConvective};
pub use humidity::{FixedRH, FixedRHParameters, FixedVMR};
pub use lapserate::{FixedLapseRate, MoistLapseRate};
pub use radiation::{GreyRadiation, GreyRadiationParameters};
pub use surface::{SurfaceFixedTemperature, SurfaceHeatCapacity};
pub use upwelling::{NoUpwelling, StratosphericUpwelling, StratosphericUpwellingParameters};
