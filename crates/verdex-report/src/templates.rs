//! Embedded report templates.
//!
//! Two variants: the normal verification report and the unavailable-data
//! report used when analysis could not be completed. PDF layout is out of
//! scope; output is plain text suitable for any renderer downstream.

/// The normal field verification report
pub const FIELD_REPORT_TEMPLATE: &str = "\
VERDEX FIELD VERIFICATION REPORT
================================
Report ID: {{report_id}}
Generated: {{generated_at}}

FIELD DETAILS
-------------
Name: {{name}}
Location: {{latitude}}, {{longitude}}
Size: {{acres}} acres
Crop: {{default crop_type \"Not specified\"}}

SATELLITE DATA
--------------
NDVI Score: {{ndvi_value}}
Health Status: {{vegetation_health}}
Reading Confidence: {{reading_confidence}}
Source: {{satellite_source}}

WEATHER DATA
------------
Avg Temperature: {{avg_temperature_c}} C
Total Rainfall: {{total_rainfall_mm}} mm
Source: {{weather_source}}

RISK ASSESSMENT
---------------
Drought Risk: {{percent drought}}
Flood Risk: {{percent flood}}
Heat Stress: {{percent heat_stress}}
Overall Risk Score: {{risk_score}}
Risk Classification: {{overall_risk}}

INSURANCE RECOMMENDATION
------------------------
Premium Adjustment: {{premium_adjustment}}

Recommended Actions:
{{#each recommendations}}
- {{this}}
{{/each}}
{{#if insight}}
AI INSIGHT (confidence {{percent insight.confidence}})
------------------------------------------------------
{{insight.narrative}}

Suggested: {{insight.recommendation}}
{{/if}}
VERIFICATION
------------
This report was generated from measured satellite and weather data.
Data Sources: {{satellite_source}}, {{weather_source}}

Report Certified By: Verdex Asset Intelligence
";

/// Shown when collection or analysis failed; no partial data is rendered
pub const UNAVAILABLE_TEMPLATE: &str = "\
VERDEX FIELD VERIFICATION REPORT
================================
Report ID: {{report_id}}
Generated: {{generated_at}}
Status: DATA UNAVAILABLE

FIELD DETAILS
-------------
Name: {{name}}
Location: {{latitude}}, {{longitude}}
Size: {{acres}} acres

ERROR REPORT
------------
{{reason}}

RECOMMENDATION
--------------
Retry analysis when data services are available.

Report Certified By: Verdex Asset Intelligence
";
