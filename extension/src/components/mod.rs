mod dashboard;
mod popup;
mod recipients;
mod settings;
mod status_banner;
mod templates;
mod user_context;

pub use dashboard::Dashboard;
pub use popup::Popup;

const LABEL_CLASS: &str = "block text-sm font-medium text-gray-700 mb-1";
const INPUT_CLASS: &str = "w-full px-3 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-blue-500 focus:border-transparent disabled:bg-gray-50";
const PRIMARY_BUTTON: &str = "bg-blue-600 text-white py-2 px-4 rounded-lg hover:bg-blue-700 transition disabled:opacity-50 disabled:cursor-not-allowed";
const SECONDARY_BUTTON: &str = "bg-gray-100 text-gray-700 py-2 px-4 rounded-lg hover:bg-gray-200 transition";
const CHIP_CLASS: &str = "inline-flex items-center px-3 py-1 rounded-full border border-blue-300 text-blue-700 text-sm";
