quantity!(Cost, "GBP");
