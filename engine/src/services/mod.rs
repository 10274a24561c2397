// Dashboard page services. Each service is one synchronous render pass:
// load the datasets, apply the sidebar filters, aggregate, format, return a
// view for the presentation layer.
pub mod dashboard;
