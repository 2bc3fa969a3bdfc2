pub mod services;

pub use services::{
    ApartmentService, FeeService, InvoiceService, ResidentService, UserService,
    UtilityBillService, VehicleService,
};
