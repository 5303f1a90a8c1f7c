mod composite_value;
