pub mod category;
pub mod grade;
pub mod pentashih;
pub mod santri;
pub mod statistic;
pub mod subject;
